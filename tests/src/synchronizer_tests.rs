use cryptodevs_dapp::abi;
use cryptodevs_dapp::sync::MINT_SUCCESS_NOTICE;
use cryptodevs_types::{Phase, UiMode};
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::utils::{make_sync, owner, user, FakeLedger, POLL};

// --- Connect ---

#[tokio::test(start_paused = true)]
async fn test_connect_reads_initial_state() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 600);
    ledger.token_ids.store(4, Ordering::SeqCst);
    let sync = make_sync(&ledger);

    assert!(sync.connect().await);

    let state = sync.snapshot();
    assert!(state.wallet_connected);
    assert!(state.presale_started);
    assert!(!state.presale_ended);
    assert_eq!(state.minted_count, 4);
    assert_eq!(state.mode(), UiMode::Connected(Phase::PresaleActive));
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_network_mismatch_stays_disconnected() {
    let ledger = FakeLedger::new();
    ledger.chain_id.store(1, Ordering::SeqCst);
    let sync = make_sync(&ledger);

    assert!(!sync.connect().await);

    let state = sync.snapshot();
    assert!(!state.wallet_connected);
    assert_eq!(state.mode(), UiMode::Disconnected);
    assert_eq!(state.notice.as_deref(), Some("Change the network to Rinkeby"));

    // No handle: reads fail without reaching the contract.
    assert!(!sync.check_presale_started().await);
    assert_eq!(ledger.calls(abi::PRESALE_STARTED), 0);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_after_switching_network() {
    let ledger = FakeLedger::new();
    ledger.chain_id.store(1, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(!sync.connect().await);

    ledger.chain_id.store(4, Ordering::SeqCst);
    assert!(sync.connect().await);
    let state = sync.snapshot();
    assert!(state.wallet_connected);
    assert!(state.notice.is_none());
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_no_accounts_is_rejection() {
    let ledger = FakeLedger::new();
    ledger.accounts.lock().unwrap().clear();
    let sync = make_sync(&ledger);

    assert!(!sync.connect().await);
    let state = sync.snapshot();
    assert!(!state.wallet_connected);
    assert!(state.notice.is_none());
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_second_connect_is_noop() {
    let ledger = FakeLedger::new();
    let sync = make_sync(&ledger);

    assert!(sync.connect().await);
    let started_reads = ledger.calls(abi::PRESALE_STARTED);
    assert!(sync.connect().await);
    assert_eq!(ledger.calls(abi::PRESALE_STARTED), started_reads);
    sync.shutdown();
}

// --- Reads ---

#[tokio::test(start_paused = true)]
async fn test_not_started_ignores_ended_timestamp() {
    let ledger = FakeLedger::new();
    ledger.set_presale(false, -100);
    let sync = make_sync(&ledger);

    assert!(sync.connect().await);
    let state = sync.snapshot();
    assert!(!state.presale_started);
    assert_eq!(ledger.calls(abi::PRESALE_ENDED), 0);
    assert!(matches!(
        state.mode(),
        UiMode::Connected(Phase::PresaleNotStarted { .. })
    ));
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_ended_presale_offers_public_mint() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, -100);
    let sync = make_sync(&ledger);

    assert!(sync.connect().await);
    let mode = sync.snapshot().mode();
    assert_eq!(mode, UiMode::Connected(Phase::PresaleEnded));
    assert!(mode.allows(cryptodevs_types::Action::PublicMint));
    assert!(!mode.allows(cryptodevs_types::Action::PresaleMint));
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_owner_detected_before_presale() {
    let ledger = FakeLedger::new();
    *ledger.owner.lock().unwrap() = user();
    let sync = make_sync(&ledger);

    assert!(sync.connect().await);
    let state = sync.snapshot();
    assert!(state.is_owner);
    assert_eq!(
        state.mode(),
        UiMode::Connected(Phase::PresaleNotStarted { can_start: true })
    );
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_owner_flag_is_latched() {
    let ledger = FakeLedger::new();
    *ledger.owner.lock().unwrap() = user();
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);
    assert!(sync.snapshot().is_owner);

    *ledger.owner.lock().unwrap() = owner();
    sync.check_presale_started().await;
    assert!(sync.snapshot().is_owner);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_read_failure_keeps_previous_state() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 600);
    ledger.token_ids.store(6, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    ledger.fail_reads.store(true, Ordering::SeqCst);
    assert!(!sync.check_presale_started().await);
    assert!(!sync.check_presale_ended().await);
    sync.refresh_minted_count().await;

    let state = sync.snapshot();
    assert!(state.presale_started);
    assert_eq!(state.minted_count, 6);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_failed_reads_on_connect_degrade_to_not_started() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, -100);
    ledger.fail_reads.store(true, Ordering::SeqCst);
    let sync = make_sync(&ledger);

    assert!(sync.connect().await);
    let state = sync.snapshot();
    assert!(state.wallet_connected);
    assert_eq!(
        state.mode(),
        UiMode::Connected(Phase::PresaleNotStarted { can_start: false })
    );
    sync.shutdown();
}

// --- Pollers ---

#[tokio::test(start_paused = true)]
async fn test_ended_poller_latches_but_minted_poller_keeps_running() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 600);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);
    assert!(sync.ended_poll_active());

    // Presale ends; the next tick observes it and the ended-check poller stops.
    ledger.set_presale(true, -100);
    tokio::time::sleep(POLL + Duration::from_secs(1)).await;
    assert!(!sync.ended_poll_active());
    assert!(!sync.is_shut_down());
    assert_eq!(
        sync.snapshot().mode(),
        UiMode::Connected(Phase::PresaleEnded)
    );

    let started_reads = ledger.calls(abi::PRESALE_STARTED);
    let ended_reads = ledger.calls(abi::PRESALE_ENDED);
    let minted_reads = ledger.calls(abi::TOKEN_IDS);

    ledger.token_ids.store(9, Ordering::SeqCst);
    tokio::time::sleep(POLL * 6).await;

    assert_eq!(ledger.calls(abi::PRESALE_STARTED), started_reads);
    assert_eq!(ledger.calls(abi::PRESALE_ENDED), ended_reads);
    assert!(ledger.calls(abi::TOKEN_IDS) >= minted_reads + 5);
    assert_eq!(sync.snapshot().minted_count, 9);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_ended_poller_runs_while_presale_open() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 3_600);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    let ended_reads = ledger.calls(abi::PRESALE_ENDED);
    tokio::time::sleep(POLL * 3 + Duration::from_secs(1)).await;
    assert!(sync.ended_poll_active());
    assert_eq!(ledger.calls(abi::PRESALE_ENDED), ended_reads + 3);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_ended_poller_skips_ended_read_before_start() {
    let ledger = FakeLedger::new();
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    tokio::time::sleep(POLL * 3 + Duration::from_secs(1)).await;
    assert!(ledger.calls(abi::PRESALE_STARTED) >= 4);
    assert_eq!(ledger.calls(abi::PRESALE_ENDED), 0);
    assert!(sync.ended_poll_active());
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_both_pollers() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 3_600);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    sync.shutdown();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!sync.ended_poll_active());

    let started_reads = ledger.calls(abi::PRESALE_STARTED);
    let minted_reads = ledger.calls(abi::TOKEN_IDS);
    tokio::time::sleep(POLL * 4).await;
    assert_eq!(ledger.calls(abi::PRESALE_STARTED), started_reads);
    assert_eq!(ledger.calls(abi::TOKEN_IDS), minted_reads);
}

#[tokio::test(start_paused = true)]
async fn test_read_completing_after_shutdown_is_noop() {
    let ledger = FakeLedger::new();
    ledger.token_ids.store(2, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);
    assert_eq!(sync.snapshot().minted_count, 2);

    *ledger.read_delay.lock().unwrap() = Duration::from_secs(2);
    ledger.token_ids.store(50, Ordering::SeqCst);

    let in_flight = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.refresh_minted_count().await })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;
    sync.shutdown();
    in_flight.await.unwrap();

    assert_eq!(sync.snapshot().minted_count, 2);
}

// --- Writes ---

#[tokio::test(start_paused = true)]
async fn test_presale_mint_holds_loading_until_confirmed() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 600);
    ledger.pending_polls.store(3, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    let mint = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.presale_mint().await })
    };
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(sync.snapshot().loading);
    assert_eq!(sync.snapshot().mode(), UiMode::Loading);

    assert!(mint.await.unwrap());
    let state = sync.snapshot();
    assert!(!state.loading);
    assert_eq!(state.notice.as_deref(), Some(MINT_SUCCESS_NOTICE));

    let sent = ledger.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, user());
    assert_eq!(&sent[0].data[..], &abi::selector(abi::PRESALE_MINT));
    assert_eq!(sent[0].value, Some(crate::utils::settings().mint_price));
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_public_mint_sends_fee() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, -100);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    assert!(sync.public_mint().await);
    let sent = ledger.sent();
    assert_eq!(&sent[0].data[..], &abi::selector(abi::MINT));
    assert_eq!(sent[0].value, Some(crate::utils::settings().mint_price));
    assert_eq!(ledger.token_ids.load(Ordering::SeqCst), 1);
    assert!(!sync.snapshot().loading);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_reverted_write_clears_loading() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 600);
    ledger.revert_writes.store(true, Ordering::SeqCst);
    ledger.pending_polls.store(2, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    let mut rx = sync.subscribe();
    let mint = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.presale_mint().await })
    };
    rx.wait_for(|s| s.loading).await.unwrap();

    assert!(!mint.await.unwrap());
    let state = sync.snapshot();
    assert!(!state.loading);
    assert!(state.notice.is_none());
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_lost_receipt_clears_loading() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, -100);
    ledger.lose_receipts.store(true, Ordering::SeqCst);
    ledger.pending_polls.store(1, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    let mut rx = sync.subscribe();
    let mint = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.public_mint().await })
    };
    rx.wait_for(|s| s.loading).await.unwrap();

    assert!(!mint.await.unwrap());
    assert!(!sync.snapshot().loading);
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_abandons_confirmation_wait() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, -100);
    ledger.pending_polls.store(usize::MAX, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    let mut rx = sync.subscribe();
    let mint = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.public_mint().await })
    };
    rx.wait_for(|s| s.loading).await.unwrap();

    sync.shutdown();
    let minted = tokio::time::timeout(Duration::from_secs(60), mint)
        .await
        .expect("write still waiting after shutdown")
        .unwrap();
    assert!(!minted);
    assert!(!sync.snapshot().loading);

    let polls = ledger.receipt_polls();
    tokio::time::sleep(Duration::from_secs(3_600)).await;
    assert_eq!(ledger.receipt_polls(), polls);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_write_never_enters_loading() {
    let ledger = FakeLedger::new();
    ledger.set_presale(true, 600);
    ledger.reject_writes.store(true, Ordering::SeqCst);
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);

    assert!(!sync.presale_mint().await);
    assert!(!sync.snapshot().loading);
    assert!(ledger.sent().is_empty());
    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_write_without_connection_fails() {
    let ledger = FakeLedger::new();
    let sync = make_sync(&ledger);

    assert!(!sync.public_mint().await);
    assert!(!sync.snapshot().loading);
    assert!(ledger.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_presale_repolls_state() {
    let ledger = FakeLedger::new();
    *ledger.owner.lock().unwrap() = user();
    let sync = make_sync(&ledger);
    assert!(sync.connect().await);
    assert!(!sync.snapshot().presale_started);

    assert!(sync.start_presale().await);
    let sent = ledger.sent();
    assert_eq!(&sent[0].data[..], &abi::selector(abi::START_PRESALE));
    assert_eq!(sent[0].value, None);

    let state = sync.snapshot();
    assert!(state.presale_started);
    assert!(!state.loading);
    assert_eq!(state.mode(), UiMode::Connected(Phase::PresaleActive));
    sync.shutdown();
}
