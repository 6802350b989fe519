// Copyright (c) 2026 - Soldr Project Developers
//! Integration tests for the benchmark stack
//!
//! These tests verify the complete flow:
//! 1. Configuration bundle → declared resource graph
//! 2. Graph → convergence through the simulated engine
//! 3. Realized state → derived outputs (`name`, `ip`, `url`)

use pretty_assertions::assert_eq;

use soldr_provision::domain::Port;
use soldr_provision::engine::{Deployment, SimulatedEngine};
use soldr_provision::output::OutputError;
use soldr_provision::resources::{Direction, ResourceKind};
use soldr_provision::stack::{service_url, BenchStack, DEFAULT_SUBNET_CIDR, SERVICE_NAME};
use soldr_provision::StackConfig;

#[test]
fn default_stack_declares_exactly_four_nodes() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let graph = stack.graph();

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.count_kind(ResourceKind::Network), 1);
    assert_eq!(graph.count_kind(ResourceKind::Subnet), 1);
    assert_eq!(graph.count_kind(ResourceKind::Firewall), 1);
    assert_eq!(graph.count_kind(ResourceKind::Instance), 1);
}

#[test]
fn subnet_and_firewall_reference_the_network() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let graph = stack.graph();
    let network = stack.network().node_id();

    let (_, subnet) = graph.subnets().next().unwrap();
    assert_eq!(subnet.network.node_id(), network);
    assert_eq!(subnet.ip_cidr_range.as_cidr(), DEFAULT_SUBNET_CIDR);

    let (_, firewall) = graph.firewalls().next().unwrap();
    assert_eq!(firewall.network.node_id(), network);
    assert_eq!(firewall.direction, Direction::Ingress);
}

#[test]
fn network_requires_explicit_subnets() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let (_, network) = stack.graph().networks().next().unwrap();
    assert!(!network.auto_create_subnetworks);
}

#[test]
fn instance_has_ordering_dependency_on_firewall() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let graph = stack.graph();

    let (node, _) = graph.instances().next().unwrap();
    assert!(node.depends_on.contains(&stack.firewall().node_id()));

    // The firewall is not a data dependency, only an ordering one
    let implicit = node.spec.references();
    assert!(!implicit.contains(&stack.firewall().node_id()));
    assert!(implicit.contains(&stack.network().node_id()));
    assert!(implicit.contains(&stack.subnet().node_id()));
}

#[test]
fn firewall_always_allows_ssh_and_service_port() {
    // Default service port
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let (_, firewall) = stack.graph().firewalls().next().unwrap();
    assert!(firewall.allows_port(Port::SSH));
    assert!(firewall.allows_port(Port::SERVICE_DEFAULT));

    // Overridden service port keeps SSH open
    let config = StackConfig::default().with_service_port(Port::new(8080).unwrap());
    let stack = BenchStack::declare(&config).unwrap();
    let (_, firewall) = stack.graph().firewalls().next().unwrap();
    assert!(firewall.allows_port(Port::SSH));
    assert!(firewall.allows_port(Port::new(8080).unwrap()));

    // Service port 22 collapses with SSH instead of duplicating
    let config = StackConfig::default().with_service_port(Port::SSH);
    let stack = BenchStack::declare(&config).unwrap();
    let (_, firewall) = stack.graph().firewalls().next().unwrap();
    assert!(firewall.allows_port(Port::SSH));
    assert_eq!(firewall.allows[0].ports.len(), 1);
}

#[test]
fn instance_tags_match_firewall_target_tags() {
    let config = StackConfig::default().with_instance_tag("bench-target");
    let stack = BenchStack::declare(&config).unwrap();
    let graph = stack.graph();

    let (_, firewall) = graph.firewalls().next().unwrap();
    let (_, instance) = graph.instances().next().unwrap();

    assert_eq!(instance.tags, firewall.target_tags);
    assert_eq!(instance.tags, vec!["bench-target".to_string()]);
}

#[test]
fn defaults_resolve_to_documented_values() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let (_, instance) = stack.graph().instances().next().unwrap();

    assert_eq!(instance.machine_type, "n1-standard-1");
    assert_eq!(instance.boot_disk.image, "debian-12");
    assert_eq!(instance.boot_disk.disk_type, "pd-ssd");
    assert!(instance.allow_stopping_for_update);
    assert!(instance.metadata_startup_script.is_some());
    assert_eq!(
        instance.service_account_scopes,
        vec!["https://www.googleapis.com/auth/cloud-platform".to_string()]
    );
}

#[test]
fn tag_matching_a_node_name_still_declares_four_nodes() {
    // The instance node is always named "soldr-service"; a tag that
    // happens to match another node's name must not collide with it.
    for tag in ["network", "subnet", "firewall", "soldr-service"] {
        let config = StackConfig::default().with_instance_tag(tag);
        let stack = BenchStack::declare(&config).unwrap();
        let graph = stack.graph();

        assert_eq!(graph.len(), 4);
        let (_, instance) = graph.instances().next().unwrap();
        assert_eq!(instance.name.as_str(), SERVICE_NAME);
        assert_eq!(instance.tags, vec![tag.to_string()]);
    }
}

#[test]
fn invalid_instance_tag_is_rejected_at_declaration() {
    let config = StackConfig::default().with_instance_tag("Not-A-Valid-Name");
    assert!(BenchStack::declare(&config).is_err());
}

#[tokio::test]
async fn deployment_resolves_name_ip_and_url() {
    let config = StackConfig::default();
    let stack = BenchStack::declare(&config).unwrap();

    let deployment = Deployment::new(stack.graph().clone());
    let outputs = stack.bind_outputs(&deployment);

    let engine = SimulatedEngine::new("test");
    let realized = deployment.run(&engine).await.unwrap();
    assert_eq!(realized.len(), 4);

    let name = outputs.name.get().await.unwrap();
    assert_eq!(name, "soldr-service");

    let ip = outputs.ip.get().await.unwrap();
    let url = outputs.url.get().await.unwrap();
    assert_eq!(url, format!("http://{ip}:3000"));
}

#[tokio::test]
async fn url_uses_overridden_service_port() {
    let config = StackConfig::default().with_service_port(Port::new(8080).unwrap());
    let stack = BenchStack::declare(&config).unwrap();

    let deployment = Deployment::new(stack.graph().clone());
    let outputs = stack.bind_outputs(&deployment);

    deployment.run(&SimulatedEngine::new("test")).await.unwrap();

    let ip = outputs.ip.get().await.unwrap();
    assert_eq!(
        outputs.url.get().await.unwrap(),
        format!("http://{ip}:8080")
    );
}

#[tokio::test]
async fn missing_public_address_fails_projection() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();

    let deployment = Deployment::new(stack.graph().clone());
    let outputs = stack.bind_outputs(&deployment);

    // Engine realizes the instance without assigning a public address
    let engine = SimulatedEngine::new("test").without_public_ips();
    deployment.run(&engine).await.unwrap();

    // Name still resolves; ip and url fail instead of defaulting
    assert_eq!(outputs.name.get().await.unwrap(), "soldr-service");
    assert!(matches!(
        outputs.ip.get().await,
        Err(OutputError::Projection(_))
    ));
    assert!(matches!(
        outputs.url.get().await,
        Err(OutputError::Projection(_))
    ));
}

#[tokio::test]
async fn exports_carry_all_three_outputs() {
    let stack = BenchStack::declare(&StackConfig::default()).unwrap();
    let deployment = Deployment::new(stack.graph().clone());
    let outputs = stack.bind_outputs(&deployment);

    deployment.run(&SimulatedEngine::new("test")).await.unwrap();

    let exports = outputs.exports();
    let resolved = exports.resolve_all().await.unwrap();
    let names: Vec<&str> = resolved.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["ip", "name", "url"]);
}

#[test]
fn service_url_formats_literals() {
    assert_eq!(
        service_url("34.1.2.3", Port::new(3000).unwrap()),
        "http://34.1.2.3:3000"
    );
}
