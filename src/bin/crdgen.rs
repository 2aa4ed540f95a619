//! # CRD Generator
//!
//! Prints the CustomResourceDefinitions of every ZPA resource kind as one
//! multi-document YAML stream.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > package/crds/zpa.crossplane.io.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use kube::core::CustomResourceExt;
use zpa_provider::crd::{
    ApplicationSegment, ProviderConfig, ProviderConfigUsage, SegmentGroup, Server, ServerGroup,
};

fn main() {
    let crds = [
        ProviderConfig::crd(),
        ProviderConfigUsage::crd(),
        Server::crd(),
        ServerGroup::crd(),
        SegmentGroup::crd(),
        ApplicationSegment::crd(),
    ];

    println!("# This file is auto-generated by crdgen");
    println!("# DO NOT EDIT THIS FILE MANUALLY");
    for crd in &crds {
        match serde_yaml::to_string(crd) {
            Ok(yaml) => {
                println!("---");
                print!("{yaml}");
            }
            Err(e) => {
                eprintln!("Failed to serialize CRD to YAML: {e}");
                std::process::exit(1);
            }
        }
    }
}
