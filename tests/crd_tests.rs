//! CRD tests
//!
//! Manifests as users write them must deserialize into the typed resources,
//! and the generated CRDs must carry the group, version and scope the
//! provider is installed with.

use kube::core::CustomResourceExt;
use kube::ResourceExt;
use zpa_provider::constants::{API_GROUP, API_VERSION};
use zpa_provider::crd::{
    ApplicationSegment, DeletionPolicy, ManagedResource, ProviderConfig, ProviderConfigUsage,
    SegmentGroup, Server, ServerGroup, Toggle,
};

#[test]
fn test_server_manifest() {
    let server: Server = serde_yaml::from_str(
        r#"
apiVersion: zpa.crossplane.io/v1alpha1
kind: Server
metadata:
  name: web-01
  annotations:
    crossplane.io/external-name: "216196257331291981"
spec:
  providerConfigRef:
    name: default
  deletionPolicy: Orphan
  forProvider:
    name: web-01
    address: 10.0.0.12
    enabled: true
    serverGroupSelector:
      matchLabels:
        app: web
"#,
    )
    .expect("valid Server manifest");

    assert_eq!(server.name_any(), "web-01");
    assert_eq!(server.external_name(), Some("216196257331291981"));
    assert_eq!(server.deletion_policy(), DeletionPolicy::Orphan);
    assert_eq!(server.provider_config_ref().map(|r| r.name.as_str()), Some("default"));

    let params = server.for_provider();
    assert_eq!(params.address.as_deref(), Some("10.0.0.12"));
    assert_eq!(params.enabled, Toggle::True);
    assert_eq!(params.config_space, None);
    assert!(params.server_groups.is_empty());
    let selector = params.server_group_selector.as_ref().expect("selector");
    assert_eq!(selector.match_labels.get("app").map(String::as_str), Some("web"));
}

#[test]
fn test_application_segment_manifest() {
    let segment: ApplicationSegment = serde_yaml::from_str(
        r#"
apiVersion: zpa.crossplane.io/v1alpha1
kind: ApplicationSegment
metadata:
  name: intranet
spec:
  providerConfigRef:
    name: default
  forProvider:
    name: intranet
    domainNames: ["intranet.example.com", "wiki.example.com"]
    tcpPortRanges: ["443", "443"]
    doubleEncrypt: false
    segmentGroupIDRef:
      name: corp-apps
    serverGroupRefs:
      - name: prod-group
"#,
    )
    .expect("valid ApplicationSegment manifest");

    assert_eq!(segment.external_name(), None);
    assert_eq!(segment.deletion_policy(), DeletionPolicy::Delete);

    let params = segment.for_provider();
    assert_eq!(params.domain_names.len(), 2);
    assert_eq!(params.tcp_port_ranges, vec!["443", "443"]);
    assert_eq!(params.double_encrypt, Toggle::False);
    assert_eq!(params.enabled, Toggle::Unset);
    assert_eq!(params.segment_group_id, None);
    assert_eq!(
        params.segment_group_id_ref.as_ref().map(|r| r.name.as_str()),
        Some("corp-apps")
    );
    assert_eq!(params.server_group_refs.len(), 1);
}

#[test]
fn test_unset_toggles_are_not_serialized() {
    let group: ServerGroup = serde_yaml::from_str(
        r#"
apiVersion: zpa.crossplane.io/v1alpha1
kind: ServerGroup
metadata:
  name: prod-group
spec:
  providerConfigRef:
    name: default
  forProvider:
    name: prod-group
    dynamicDiscovery: true
    appConnectorGroups: ["72058304855015000"]
"#,
    )
    .expect("valid ServerGroup manifest");

    let rendered = serde_json::to_value(group.for_provider()).expect("serializable");
    assert_eq!(rendered["dynamicDiscovery"], true);
    assert!(rendered.get("enabled").is_none());
    assert!(rendered.get("ipAnchored").is_none());
}

#[test]
fn test_generated_crds_are_cluster_scoped() {
    let crds = [
        ProviderConfig::crd(),
        ProviderConfigUsage::crd(),
        Server::crd(),
        ServerGroup::crd(),
        SegmentGroup::crd(),
        ApplicationSegment::crd(),
    ];

    for crd in &crds {
        assert_eq!(crd.spec.group, API_GROUP);
        assert_eq!(crd.spec.scope, "Cluster", "{}", crd.spec.names.kind);
        assert!(crd.spec.versions.iter().any(|v| v.name == API_VERSION));
    }

    assert_eq!(
        Server::crd().metadata.name.as_deref(),
        Some("servers.zpa.crossplane.io")
    );
    assert_eq!(
        ApplicationSegment::crd().metadata.name.as_deref(),
        Some("applicationsegments.zpa.crossplane.io")
    );
}
