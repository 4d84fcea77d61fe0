//! # KfDef Operator
//!
//! A Kubernetes operator that reconciles `KfDef` deployment resources.
//!
//! ## Overview
//!
//! This crate is the startup orchestrator for the operator process:
//!
//! 1. **Namespace resolution** - `WATCH_NAMESPACE` selects all namespaces,
//!    one namespace, or a fixed comma-separated set
//! 2. **Leader election** - exactly one replica holds the operator lease and
//!    reconciles; the rest wait
//! 3. **Manager construction** - a shared client/controller context scoped by
//!    the resolved namespaces
//! 4. **Ownership-filtered metrics** - the registered Group/Version/Kind
//!    universe is filtered down to the kinds this operator watches, and
//!    per-resource metrics are generated only for those
//! 5. **Run loop** - the manager blocks until a termination signal
//!
//! ## Usage
//!
//! See the [README.md](../README.md) for deployment instructions.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod leadership;
pub mod manager;
pub mod observability;
pub mod runtime;
pub mod scheme;

pub use crd::KfDef;
