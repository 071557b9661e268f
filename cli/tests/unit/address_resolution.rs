//! Tests for the platform dispatcher.
//!
//! Dispatch picks exactly one strategy per known platform, takes the SSH port
//! from it, never runs a strategy for an unknown platform, and treats
//! bootstrap and control plane failures differently.

#![allow(clippy::expect_used)]

use bootstrap_gather::application::services::address_resolution::PlatformDispatcher;
use bootstrap_gather::domain::bundle::collection_command;
use bootstrap_gather::domain::error::{ExtractError, ResolveError};
use bootstrap_gather::domain::tfstate::TerraformState;
use gather_common::Platform;
use serde_json::json;

use crate::mocks::{CannedStrategy, StrategyCalls, state_with};

fn dispatcher_with(strategies: Vec<(Platform, CannedStrategy)>) -> PlatformDispatcher {
    let mut dispatcher = PlatformDispatcher::empty();
    for (platform, strategy) in strategies {
        dispatcher.register(platform, strategy);
    }
    dispatcher
}

#[test]
fn each_known_platform_selects_only_its_own_strategy() {
    let known = [
        Platform::Aws,
        Platform::Azure,
        Platform::Libvirt,
        Platform::OpenStack,
    ];
    for selected in &known {
        let mut calls: Vec<(Platform, StrategyCalls)> = Vec::new();
        let mut dispatcher = PlatformDispatcher::empty();
        for platform in &known {
            let strategy = CannedStrategy::new(&format!("{platform}-bootstrap"), &["m0"]);
            calls.push((platform.clone(), strategy.calls()));
            dispatcher.register(platform.clone(), strategy);
        }

        let hosts = dispatcher
            .resolve(selected, &TerraformState::default())
            .expect("resolve");
        assert_eq!(hosts.bootstrap, format!("{selected}-bootstrap"));

        for (platform, counters) in &calls {
            let expected = usize::from(platform == selected);
            assert_eq!(counters.bootstrap_calls(), expected, "{platform} bootstrap");
            assert_eq!(counters.control_plane_calls(), expected, "{platform} masters");
        }
    }
}

#[test]
fn port_comes_from_the_selected_strategy() {
    let dispatcher = dispatcher_with(vec![
        (Platform::Aws, CannedStrategy::new("b", &["m"])),
        (Platform::Azure, CannedStrategy::new("b", &["m"]).with_port(2200)),
    ]);
    let state = TerraformState::default();
    assert_eq!(dispatcher.resolve(&Platform::Aws, &state).expect("aws").port, 22);
    assert_eq!(dispatcher.resolve(&Platform::Azure, &state).expect("azure").port, 2200);
}

#[test]
fn unknown_platform_is_unsupported_and_runs_no_strategy() {
    let aws = CannedStrategy::new("b", &["m"]);
    let calls = aws.calls();
    let dispatcher = dispatcher_with(vec![(Platform::Aws, aws)]);

    let err = dispatcher
        .resolve(&Platform::Other("vsphere".to_string()), &TerraformState::default())
        .expect_err("unsupported");

    assert!(matches!(
        &err,
        ResolveError::UnsupportedPlatform { platform } if platform == "vsphere"
    ));
    assert_eq!(calls.total(), 0);
}

#[test]
fn bootstrap_failure_short_circuits_control_plane() {
    let strategy = CannedStrategy::failing_bootstrap();
    let calls = strategy.calls();
    let dispatcher = dispatcher_with(vec![(Platform::Aws, strategy)]);

    let err = dispatcher
        .resolve(&Platform::Aws, &TerraformState::default())
        .expect_err("bootstrap missing");

    assert!(matches!(
        err,
        ResolveError::BootstrapExtraction(ExtractError::ResourceNotFound { .. })
    ));
    assert_eq!(calls.bootstrap_calls(), 1);
    assert_eq!(calls.control_plane_calls(), 0);
}

#[test]
fn control_plane_failure_yields_empty_list() {
    let strategy = CannedStrategy::failing_control_plane("10.0.0.5");
    let calls = strategy.calls();
    let dispatcher = dispatcher_with(vec![(Platform::Libvirt, strategy)]);

    let hosts = dispatcher
        .resolve(&Platform::Libvirt, &TerraformState::default())
        .expect("non-fatal");

    assert_eq!(hosts.bootstrap, "10.0.0.5");
    assert!(hosts.control_plane.is_empty());
    assert!(matches!(
        hosts.control_plane_error,
        Some(ExtractError::NoInstances { .. })
    ));
    assert_eq!(calls.control_plane_calls(), 1);
}

#[test]
fn register_replaces_existing_strategy() {
    let mut dispatcher = PlatformDispatcher::with_builtin_platforms();
    dispatcher.register(Platform::Aws, CannedStrategy::new("override", &[]));

    let hosts = dispatcher
        .resolve(&Platform::Aws, &TerraformState::default())
        .expect("resolve");
    assert_eq!(hosts.bootstrap, "override");
}

#[test]
fn register_adds_a_new_platform() {
    let mut dispatcher = PlatformDispatcher::with_builtin_platforms();
    let gcp = Platform::Other("gcp".to_string());
    assert!(!dispatcher.supports(&gcp));

    dispatcher.register(gcp.clone(), CannedStrategy::new("34.1.2.3", &["10.0.0.2"]));

    assert!(dispatcher.supports(&gcp));
    let hosts = dispatcher
        .resolve(&gcp, &TerraformState::default())
        .expect("resolve");
    assert_eq!(hosts.control_plane, vec!["10.0.0.2"]);
}

#[test]
fn builtin_dispatcher_reads_azure_state_on_port_2200() {
    let mut state = state_with(
        "module.bootstrap",
        "azurerm_public_ip",
        "bootstrap_public_ip",
        &[json!({"ip_address": "52.1.1.1"})],
    );
    state.resources.extend(
        state_with(
            "module.master",
            "azurerm_network_interface",
            "master",
            &[
                json!({"private_ip_address": "10.0.0.4"}),
                json!({"private_ip_address": "10.0.0.5"}),
            ],
        )
        .resources,
    );

    let hosts = PlatformDispatcher::default()
        .resolve(&Platform::Azure, &state)
        .expect("azure");

    assert_eq!(hosts.bootstrap, "52.1.1.1");
    assert_eq!(hosts.port, 2200);
    assert_eq!(hosts.control_plane, vec!["10.0.0.4", "10.0.0.5"]);
    assert!(hosts.control_plane_error.is_none());
}

#[test]
fn builtin_dispatcher_reports_partial_control_plane_as_error() {
    let mut state = state_with(
        "module.bootstrap",
        "aws_instance",
        "bootstrap",
        &[json!({"public_ip": "3.3.3.3"})],
    );
    state.resources.extend(
        state_with(
            "module.masters",
            "aws_instance",
            "master",
            &[json!({"private_ip": "10.0.1.1"}), json!({})],
        )
        .resources,
    );

    let hosts = PlatformDispatcher::default()
        .resolve(&Platform::Aws, &state)
        .expect("non-fatal");

    assert_eq!(hosts.port, 22);
    assert!(hosts.control_plane.is_empty());
    assert!(matches!(
        hosts.control_plane_error,
        Some(ExtractError::Incomplete { .. })
    ));
}

#[test]
fn control_plane_address_with_shell_metacharacters_is_rejected() {
    let mut state = state_with(
        "module.bootstrap",
        "aws_instance",
        "bootstrap",
        &[json!({"public_ip": "3.3.3.3"})],
    );
    state.resources.extend(
        state_with(
            "module.masters",
            "aws_instance",
            "master",
            &[
                json!({"private_ip": "10.0.0.5"}),
                json!({"private_ip": "10.0.0.6; touch /tmp/pwned"}),
            ],
        )
        .resources,
    );

    let hosts = PlatformDispatcher::default()
        .resolve(&Platform::Aws, &state)
        .expect("control plane failure is not fatal");

    assert_eq!(hosts.bootstrap, "3.3.3.3");
    assert!(hosts.control_plane.is_empty());
    assert!(matches!(
        hosts.control_plane_error,
        Some(ExtractError::InvalidAddress(_))
    ));
    assert_eq!(
        collection_command(&hosts.control_plane),
        "/usr/local/bin/installer-gather.sh"
    );
}

#[test]
fn bootstrap_address_with_shell_metacharacters_is_fatal() {
    let strategy = CannedStrategy::new("3.3.3.3 && reboot", &["10.0.0.6"]);
    let calls = strategy.calls();
    let dispatcher = dispatcher_with(vec![(Platform::Aws, strategy)]);

    let err = dispatcher
        .resolve(&Platform::Aws, &TerraformState::default())
        .expect_err("invalid bootstrap");

    assert!(matches!(
        err,
        ResolveError::BootstrapExtraction(ExtractError::InvalidAddress(_))
    ));
    assert_eq!(calls.control_plane_calls(), 0);
}
