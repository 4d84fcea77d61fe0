//! Print the KfDef CRD manifest.
//!
//! Usage:
//!   cargo run --bin crdgen > config/crd/kfdef.yaml

use kube::CustomResourceExt;

use kfdef_operator::crd::KfDef;

fn main() {
    let crd = KfDef::crd();
    print!(
        "{}",
        serde_yaml::to_string(&crd).expect("KfDef CRD serializes to YAML")
    );
}
