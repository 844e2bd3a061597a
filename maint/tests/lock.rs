//! Kill-switch behavior across invocations.

mod common;

use common::*;
use ledgerkit_hostapi::{LedgerError, Namespace};
use ledgerkit_maint::{MaintConfig, MaintError, MaintenanceTool, Outcome, Phase};

fn locked_ledger(tool: &MaintenanceTool) -> ledgerkit_hostapi::MemLedger {
    let mut ledger = ledger_with_private();
    assert_eq!(tool.invoke(&mut ledger, args(&["Lock"])).unwrap(), Outcome::Locked);
    ledger.commit();
    ledger
}

#[test]
fn test_lock_writes_sentinel() {
    let tool = MaintenanceTool::default();
    let ledger = locked_ledger(&tool);

    let public = ledger.committed(&Namespace::Public).unwrap();
    assert_eq!(public.get("debuglock_").map(Vec::as_slice), Some(&b"1"[..]));
}

#[test]
fn test_locked_interpreter_rejects_every_command() {
    let tool = MaintenanceTool::default();
    let mut ledger = locked_ledger(&tool);
    let before = ledger.state_digest();

    let invocations = [
        args(&["DelState", "keys", r#"["a","b"]"#]),
        args(&["DelState", "query", r#"{"selector":{}}"#]),
        args(&["DelPrivState", "keys", "orgA", r#""p1""#]),
        args(&["DelPrivState", "query", "orgA", r#"{"selector":{}}"#]),
        args(&["Lock"]),
        args(&["Unknown"]),
        Vec::new(),
    ];

    for argv in invocations {
        let err = tool.invoke(&mut ledger, argv.clone()).unwrap_err();
        assert!(err.is_locked(), "{argv:?} gave {err:?}");
        assert_eq!(err.phase(), Phase::Idle);
        assert_eq!(ledger.pending_writes(), 0);
    }

    ledger.commit();
    assert_eq!(ledger.state_digest(), before);
}

#[test]
fn test_locked_response_message() {
    let tool = MaintenanceTool::default();
    let mut ledger = locked_ledger(&tool);

    let response = tool.handle(&mut ledger, args(&["DelState", "keys", r#""a""#]));
    assert!(!response.is_ok());
    assert_eq!(response.message, "unsupported function");
}

#[test]
fn test_lock_check_precedes_transient_decode() {
    let tool = MaintenanceTool::default();
    let mut ledger = locked_ledger(&tool);
    ledger.set_transient("args", b"not json".to_vec());

    let err = tool.invoke(&mut ledger, Vec::new()).unwrap_err();
    assert!(matches!(err, MaintError::Locked));
}

#[test]
fn test_lock_is_visible_within_the_same_transaction() {
    let tool = MaintenanceTool::default();
    let mut ledger = asset_ledger();

    tool.invoke(&mut ledger, args(&["Lock"])).unwrap();
    let err = tool
        .invoke(&mut ledger, args(&["DelState", "keys", r#""a""#]))
        .unwrap_err();

    assert!(err.is_locked());
}

#[test]
fn test_any_sentinel_value_counts_as_locked() {
    let tool = MaintenanceTool::default();
    let mut ledger = asset_ledger();
    ledger.insert(Namespace::Public, "debuglock_", Vec::new());

    let err = tool
        .invoke(&mut ledger, args(&["DelState", "keys", r#""a""#]))
        .unwrap_err();
    assert!(err.is_locked());
}

#[test]
fn test_private_sentinel_does_not_lock() {
    let tool = MaintenanceTool::default();
    let mut ledger = asset_ledger();
    ledger.insert(Namespace::Private("orgA".into()), "debuglock_", b"1".to_vec());

    let outcome = tool
        .invoke(&mut ledger, args(&["DelState", "keys", r#""a""#]))
        .unwrap();
    assert!(matches!(outcome, Outcome::Deleted(_)));
}

#[test]
fn test_lock_through_transient_args() {
    let tool = MaintenanceTool::default();
    let mut ledger = asset_ledger();
    ledger.set_transient("args", br#"["Lock"]"#.to_vec());

    let outcome = tool
        .invoke(&mut ledger, args(&["DelState", "keys", r#""a""#]))
        .unwrap();
    ledger.commit();

    assert_eq!(outcome, Outcome::Locked);
    assert!(ledger.public_keys().contains(&"a".to_string()));
    assert!(ledger.public_keys().contains(&"debuglock_".to_string()));
}

#[test]
fn test_custom_lock_key() {
    let tool = MaintenanceTool::new(MaintConfig::default().with_lock_key("maint_lock"));
    let mut ledger = asset_ledger();

    tool.invoke(&mut ledger, args(&["Lock"])).unwrap();
    ledger.commit();

    assert!(ledger.public_keys().contains(&"maint_lock".to_string()));
    assert!(!ledger.public_keys().contains(&"debuglock_".to_string()));

    // The default interpreter does not see the custom sentinel.
    let outcome = MaintenanceTool::default()
        .invoke(&mut ledger, args(&["DelState", "keys", r#""a""#]))
        .unwrap();
    assert!(matches!(outcome, Outcome::Deleted(_)));
}

#[test]
fn test_failed_lock_write_leaves_interpreter_unlocked() {
    let tool = MaintenanceTool::default();
    let mut ledger = asset_ledger();
    ledger.fail_puts_with(LedgerError::write_rejected("endorsement policy"));

    let err = tool.invoke(&mut ledger, args(&["Lock"])).unwrap_err();
    assert!(matches!(err, MaintError::Write(_)));
    ledger.commit();

    let outcome = tool
        .invoke(&mut ledger, args(&["DelState", "keys", r#""a""#]))
        .unwrap();
    assert!(matches!(outcome, Outcome::Deleted(_)));
}
