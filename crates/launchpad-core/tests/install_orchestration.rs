//! Install orchestration: duplicate guard, status lifecycle and reset window.

mod support;

use std::sync::Arc;
use std::time::Duration;

use launchpad_core::orchestration::{InstallOrchestrator, InstallOutcome};
use launchpad_core::registry::Registry;
use launchpad_core::types::{ClientKind, InstallAck, InstallStatus};
use support::{FakeClientService, Reply, feather_client, vanilla_client};

const RESET_WINDOW: Duration = Duration::from_secs(3);

fn setup() -> (Arc<FakeClientService>, Registry, Arc<InstallOrchestrator>) {
    let service = FakeClientService::new();
    let registry = Registry::new();
    let installer = Arc::new(InstallOrchestrator::new(
        service.clone(),
        registry.clone(),
        RESET_WINDOW,
    ));
    (service, registry, installer)
}

#[tokio::test(start_paused = true)]
async fn install_success_moves_through_statuses_and_resets() {
    let (service, registry, installer) = setup();
    service.set_install_reply(
        Reply::ok(InstallAck {
            message: "Client VanillaClient installed successfully".to_string(),
            path: None,
        })
        .after(Duration::from_millis(500)),
    );

    let task = {
        let installer = Arc::clone(&installer);
        tokio::spawn(async move { installer.install(&vanilla_client()).await })
    };
    tokio::task::yield_now().await;
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Installing)
    );

    let outcome = task.await.unwrap();
    assert_eq!(
        outcome,
        InstallOutcome::Installed {
            message: "Client VanillaClient installed successfully".to_string()
        }
    );
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Success)
    );

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Success)
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(registry.install_status("VanillaClient"), None);
}

#[tokio::test(start_paused = true)]
async fn second_install_while_installing_sends_nothing() {
    let (service, registry, installer) = setup();
    service.set_install_reply(
        Reply::ok(InstallAck::default()).after(Duration::from_secs(1)),
    );

    let first = {
        let installer = Arc::clone(&installer);
        tokio::spawn(async move { installer.install(&vanilla_client()).await })
    };
    tokio::task::yield_now().await;

    let second = installer.install(&vanilla_client()).await;
    assert_eq!(second, InstallOutcome::AlreadyInstalling);
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Installing)
    );

    assert!(matches!(
        first.await.unwrap(),
        InstallOutcome::Installed { .. }
    ));
    assert_eq!(service.install_requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn installs_for_different_names_run_independently() {
    let (service, registry, installer) = setup();
    service.set_install_reply(
        Reply::ok(InstallAck::default()).after(Duration::from_secs(1)),
    );

    let vanilla = {
        let installer = Arc::clone(&installer);
        tokio::spawn(async move { installer.install(&vanilla_client()).await })
    };
    let feather = {
        let installer = Arc::clone(&installer);
        tokio::spawn(async move { installer.install(&feather_client()).await })
    };
    tokio::task::yield_now().await;

    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Installing)
    );
    assert_eq!(
        registry.install_status("Feather"),
        Some(InstallStatus::Installing)
    );

    vanilla.await.unwrap();
    feather.await.unwrap();
    assert_eq!(service.install_requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn install_request_carries_record_fields() {
    let (service, _registry, installer) = setup();

    installer.install(&vanilla_client()).await;

    let requests = service.install_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "VanillaClient");
    assert_eq!(requests[0].path, "/app/clients/vanilla.jar");
    assert_eq!(requests[0].kind, ClientKind::Jar);
    assert_eq!(requests[0].version, "1.20.1");
}

#[tokio::test(start_paused = true)]
async fn successful_install_refreshes_installed_set() {
    let (service, registry, installer) = setup();
    assert!(registry.installed_clients().is_empty());

    installer.install(&vanilla_client()).await;

    assert_eq!(service.installed_calls(), 1);
    let installed = registry.installed_clients();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].name, "VanillaClient");
    assert!(installed[0].is_installed());
}

#[tokio::test(start_paused = true)]
async fn failed_relist_still_counts_as_installed() {
    let (service, registry, installer) = setup();
    service.fail_list_installed(true);

    let outcome = installer.install(&vanilla_client()).await;

    assert!(matches!(outcome, InstallOutcome::Installed { .. }));
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Success)
    );
    assert!(registry.installed_clients().is_empty());
}

#[tokio::test(start_paused = true)]
async fn install_failure_sets_error_then_resets() {
    let (service, registry, installer) = setup();
    service.set_install_reply(Reply::fail("disk full"));

    let outcome = installer.install(&vanilla_client()).await;

    match outcome {
        InstallOutcome::Failed { reason } => assert!(reason.contains("disk full")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Error)
    );
    assert_eq!(service.installed_calls(), 0);

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    assert_eq!(registry.install_status("VanillaClient"), None);
}

#[tokio::test(start_paused = true)]
async fn retry_inside_reset_window_is_not_cleared_by_old_timer() {
    let (service, registry, installer) = setup();
    service.set_install_reply(Reply::fail("network down"));
    installer.install(&vanilla_client()).await;
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Error)
    );

    tokio::time::sleep(Duration::from_secs(2)).await;
    service.set_install_reply(
        Reply::ok(InstallAck::default()).after(Duration::from_secs(2)),
    );
    let retry = {
        let installer = Arc::clone(&installer);
        tokio::spawn(async move { installer.install(&vanilla_client()).await })
    };

    // The error reset would have fired one second from the retry.
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Installing)
    );

    assert!(matches!(
        retry.await.unwrap(),
        InstallOutcome::Installed { .. }
    ));
    assert_eq!(
        registry.install_status("VanillaClient"),
        Some(InstallStatus::Success)
    );
    assert_eq!(service.install_requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn status_changes_are_published_to_subscribers() {
    let (service, registry, installer) = setup();
    service.set_install_reply(
        Reply::ok(InstallAck::default()).after(Duration::from_millis(100)),
    );
    let mut updates = registry.subscribe();
    updates.borrow_and_update();

    let task = {
        let installer = Arc::clone(&installer);
        tokio::spawn(async move { installer.install(&vanilla_client()).await })
    };

    updates.changed().await.unwrap();
    assert_eq!(
        updates.borrow_and_update().status_of("VanillaClient"),
        Some(InstallStatus::Installing)
    );

    task.await.unwrap();
    assert!(updates.has_changed().unwrap());
    assert_eq!(
        updates.borrow_and_update().status_of("VanillaClient"),
        Some(InstallStatus::Success)
    );
}
