//! Integration tests for reading well-formed domain documents.
//!
//! These tests check the operations emitted for every section, their order,
//! and the parameters carried from attributes and nested elements, for both
//! supported schema revisions.

use std::fs;
use std::path::PathBuf;
use topology_rs::ModelValue;
use topology_rs_xml::{DomainXml, SimpleSubsystem, SubsystemRegistry};

/// Loads a document from the `tests/data/` directory.
fn load_test_file(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

/// The smallest document with a profile, a binding group and a server group.
const WORKED_EXAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<domain xmlns="urn:jboss:domain:1.1">
    <profiles>
        <profile name="default">
            <subsystem xmlns="urn:test:web:1.0" default-host="localhost"/>
        </profile>
    </profiles>
    <interfaces>
        <interface name="public">
            <inet-address value="127.0.0.1"/>
        </interface>
    </interfaces>
    <socket-binding-groups>
        <socket-binding-group name="standard" default-interface="public">
            <socket-binding name="http" port="8080"/>
        </socket-binding-group>
    </socket-binding-groups>
    <server-groups>
        <server-group name="main" profile="default"/>
    </server-groups>
</domain>"#;

fn domain_xml() -> DomainXml {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut registry = SubsystemRegistry::new();
    SimpleSubsystem::new("web", "urn:test:web:1.0").register_into(&mut registry);
    SimpleSubsystem::new("logging", "urn:test:logging:1.0").register_into(&mut registry);
    DomainXml::new(registry)
}

#[test]
fn test_worked_example_operation_order() {
    let ops = domain_xml().read_domain(WORKED_EXAMPLE).unwrap();
    let addresses: Vec<String> = ops.iter().map(|op| op.address.to_string()).collect();
    assert_eq!(
        addresses,
        vec![
            "/profile=default",
            "/profile=default/subsystem=web",
            "/interface=public",
            "/socket-binding-group=standard",
            "/socket-binding-group=standard/socket-binding=http",
            "/server-group=main",
        ]
    );

    assert_eq!(ops[3].parameter("default-interface").and_then(ModelValue::as_str), Some("public"));
    assert_eq!(ops[4].parameter("port"), Some(&ModelValue::Int(8080)));
    assert_eq!(ops[5].parameter("profile").and_then(ModelValue::as_str), Some("default"));
}

#[test]
fn test_full_document_operation_order() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let addresses: Vec<String> = ops.iter().map(|op| op.address.to_string()).collect();
    assert_eq!(
        addresses,
        vec![
            "/",
            "/extension=org.example.web",
            "/extension=org.example.logging",
            "/system-property=java.net.preferIPv4Stack",
            "/system-property=startup.marker",
            "/path=data.dir",
            "/profile=base",
            "/profile=base/subsystem=logging",
            "/profile=default",
            "/profile=default/subsystem=web",
            "/interface=management",
            "/interface=public",
            "/socket-binding-group=base-sockets",
            "/socket-binding-group=base-sockets/socket-binding=jndi",
            "/socket-binding-group=standard-sockets",
            "/socket-binding-group=standard-sockets/socket-binding=http",
            "/socket-binding-group=standard-sockets/socket-binding=jgroups",
            "/socket-binding-group=standard-sockets/remote-destination-outbound-socket-binding=mail-smtp",
            "/socket-binding-group=standard-sockets/local-destination-outbound-socket-binding=local-jndi",
            "/deployment=app.war",
            "/deployment=tools",
            "/server-group=main",
            "/server-group=main/jvm=default",
            "/server-group=main/deployment=app.war",
            "/server-group=main/deployment=tools",
            "/server-group=main/system-property=group.name",
        ]
    );
    assert!(ops.iter().all(|op| op.kind == topology_rs::OperationKind::Add));
}

#[test]
fn test_root_namespace_declarations() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let root = &ops[0];
    assert!(root.address.is_empty());

    let namespaces = root.parameter("namespaces").and_then(ModelValue::as_object).unwrap();
    assert_eq!(
        namespaces.get("xsi").and_then(ModelValue::as_str),
        Some("http://www.w3.org/2001/XMLSchema-instance")
    );
    let locations = root.parameter("schema-locations").and_then(ModelValue::as_object).unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(
        locations.get("urn:jboss:domain:1.1").and_then(ModelValue::as_str),
        Some("jboss-domain_1_1.xsd")
    );
}

#[test]
fn test_system_properties_and_paths() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let find = |address: &str| ops.iter().find(|op| op.address.to_string() == address).unwrap();

    let ipv4 = find("/system-property=java.net.preferIPv4Stack");
    assert_eq!(ipv4.parameter("value").and_then(ModelValue::as_str), Some("true"));
    assert!(ipv4.parameter("boot-time").is_none());

    let marker = find("/system-property=startup.marker");
    assert_eq!(marker.parameter("boot-time"), Some(&ModelValue::Boolean(false)));
    assert!(marker.parameter("value").is_none());

    let data = find("/path=data.dir");
    assert_eq!(data.parameter("path").and_then(ModelValue::as_str), Some("data"));
    assert_eq!(data.parameter("relative-to").and_then(ModelValue::as_str), Some("jboss.home.dir"));
}

#[test]
fn test_profile_includes_and_subsystem_parameters() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let find = |address: &str| ops.iter().find(|op| op.address.to_string() == address).unwrap();

    assert_eq!(find("/profile=base").parameter("includes"), Some(&ModelValue::List(vec![])));
    assert_eq!(
        find("/profile=default").parameter("includes"),
        Some(&ModelValue::List(vec![ModelValue::from("base")]))
    );
    assert_eq!(
        find("/profile=default/subsystem=web")
            .parameter("default-host")
            .and_then(ModelValue::as_str),
        Some("localhost")
    );
}

#[test]
fn test_interface_criteria() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let find = |address: &str| ops.iter().find(|op| op.address.to_string() == address).unwrap();

    let management = find("/interface=management");
    assert_eq!(management.parameter("loopback"), Some(&ModelValue::Boolean(true)));
    assert_eq!(management.parameters.len(), 1);

    let public = find("/interface=public");
    assert_eq!(public.parameter("inet-address").and_then(ModelValue::as_str), Some("127.0.0.1"));
    assert_eq!(public.parameter("up"), Some(&ModelValue::Boolean(true)));
}

#[test]
fn test_socket_bindings() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let find = |address: &str| ops.iter().find(|op| op.address.to_string() == address).unwrap();

    let group = find("/socket-binding-group=standard-sockets");
    assert_eq!(
        group.parameter("includes"),
        Some(&ModelValue::List(vec![ModelValue::from("base-sockets")]))
    );

    let jgroups = find("/socket-binding-group=standard-sockets/socket-binding=jgroups");
    assert_eq!(jgroups.parameter("port"), Some(&ModelValue::Int(0)));
    assert_eq!(jgroups.parameter("fixed-port"), Some(&ModelValue::Boolean(true)));
    assert_eq!(
        jgroups.parameter("multicast-address").and_then(ModelValue::as_str),
        Some("230.0.0.4")
    );
    assert_eq!(jgroups.parameter("multicast-port"), Some(&ModelValue::Int(45688)));
    assert!(jgroups.parameter("interface").is_none());

    let smtp = find("/socket-binding-group=standard-sockets/remote-destination-outbound-socket-binding=mail-smtp");
    assert_eq!(smtp.parameter("host").and_then(ModelValue::as_str), Some("smtp.example.com"));
    assert_eq!(smtp.parameter("port"), Some(&ModelValue::Int(25)));
    assert_eq!(
        smtp.parameter("source-interface").and_then(ModelValue::as_str),
        Some("management")
    );

    let local = find("/socket-binding-group=standard-sockets/local-destination-outbound-socket-binding=local-jndi");
    assert_eq!(
        local.parameter("socket-binding-ref").and_then(ModelValue::as_str),
        Some("jndi")
    );
}

#[test]
fn test_deployment_content() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let find = |address: &str| ops.iter().find(|op| op.address.to_string() == address).unwrap();

    let app = find("/deployment=app.war");
    assert_eq!(app.parameter("runtime-name").and_then(ModelValue::as_str), Some("app.war"));
    let content = app.parameter("content").and_then(ModelValue::as_list).unwrap();
    assert_eq!(content.len(), 1);
    let hash = content[0]
        .as_object()
        .and_then(|item| item.get("hash"))
        .and_then(ModelValue::as_bytes)
        .unwrap();
    assert_eq!(hash.len(), 20);
    assert_eq!(hash[0], 0x01);
    assert_eq!(hash[19], 0x67);

    let tools = find("/deployment=tools");
    let item = tools.parameter("content").and_then(ModelValue::as_list).unwrap()[0]
        .as_object()
        .unwrap();
    assert_eq!(item.get("path").and_then(ModelValue::as_str), Some("deployments/tools"));
    assert_eq!(item.get("relative-to").and_then(ModelValue::as_str), Some("jboss.home.dir"));
    assert_eq!(item.get("archive"), Some(&ModelValue::Boolean(false)));
}

#[test]
fn test_server_group_folds_socket_binding_group() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let find = |address: &str| ops.iter().find(|op| op.address.to_string() == address).unwrap();

    let group = find("/server-group=main");
    assert_eq!(group.parameter("profile").and_then(ModelValue::as_str), Some("default"));
    assert_eq!(
        group.parameter("socket-binding-group").and_then(ModelValue::as_str),
        Some("standard-sockets")
    );
    assert_eq!(group.parameter("socket-binding-port-offset"), Some(&ModelValue::Int(100)));
    assert_eq!(
        group.parameter("management-subsystem-endpoint"),
        Some(&ModelValue::Boolean(false))
    );

    assert_eq!(
        find("/server-group=main/deployment=app.war").parameter("enabled"),
        Some(&ModelValue::Boolean(true))
    );
    assert_eq!(
        find("/server-group=main/deployment=tools").parameter("enabled"),
        Some(&ModelValue::Boolean(false))
    );
    assert_eq!(
        find("/server-group=main/system-property=group.name")
            .parameter("value")
            .and_then(ModelValue::as_str),
        Some("main")
    );
}

#[test]
fn test_jvm_settings() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.1.xml")).unwrap();
    let jvm = ops
        .iter()
        .find(|op| op.address.to_string() == "/server-group=main/jvm=default")
        .unwrap();

    assert_eq!(jvm.parameter("debug-enabled"), Some(&ModelValue::Boolean(false)));
    assert_eq!(jvm.parameter("heap-size").and_then(ModelValue::as_str), Some("64m"));
    assert_eq!(jvm.parameter("max-heap-size").and_then(ModelValue::as_str), Some("512m"));
    assert!(jvm.parameter("permgen-size").is_none());
    assert_eq!(jvm.parameter("max-permgen-size").and_then(ModelValue::as_str), Some("256m"));
    assert_eq!(jvm.parameter("stack-size").and_then(ModelValue::as_str), Some("1m"));
    assert_eq!(
        jvm.parameter("jvm-options"),
        Some(&ModelValue::List(vec![ModelValue::from("-server")]))
    );
    let env = jvm.parameter("environment-variables").and_then(ModelValue::as_object).unwrap();
    assert_eq!(env.get("LANG").and_then(ModelValue::as_str), Some("en_US.UTF-8"));
}

#[test]
fn test_revision_1_0_document() {
    let ops = domain_xml().read_domain(&load_test_file("domain-1.0.xml")).unwrap();
    let addresses: Vec<String> = ops.iter().map(|op| op.address.to_string()).collect();
    assert_eq!(
        addresses,
        vec![
            "/profile=default",
            "/profile=default/subsystem=web",
            "/socket-binding-group=standard",
            "/socket-binding-group=standard/socket-binding=http",
            "/server-group=main",
        ]
    );
    assert_eq!(
        ops[4].parameter("socket-binding-group").and_then(ModelValue::as_str),
        Some("standard")
    );
}

#[test]
fn test_empty_domain() {
    let ops = domain_xml()
        .read_domain(r#"<domain xmlns="urn:jboss:domain:1.1"/>"#)
        .unwrap();
    assert!(ops.is_empty());
}

#[test]
fn test_operations_serialize_to_json() {
    let ops = domain_xml().read_domain(WORKED_EXAMPLE).unwrap();
    let json = serde_json::to_string(&ops).unwrap();
    let back: Vec<topology_rs::Operation> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ops);
}
