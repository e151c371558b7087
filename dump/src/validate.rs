use {
    crate::{Account, StateDump, ValidationError, Violation, ViolationKind},
    regenesis_shared::primitives::{is_lower_hex, is_precompile},
    tracing::info,
};

/// Checks every account of `dump` for the invariants the surgery relies on.
///
/// Hex fields must be lower-case, the balance must be a decimal number and zero unless the
/// account is a precompile. All violations are collected before failing.
pub fn validate(dump: &StateDump) -> Result<(), ValidationError> {
    let violations: Vec<_> = dump.accounts.values().flat_map(account_violations).collect();

    if violations.is_empty() {
        info!(accounts = dump.len(), "State dump passed validation");
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn account_violations(account: &Account) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut check = |field: &'static str, kind: Option<ViolationKind>| {
        if let Some(kind) = kind {
            violations.push(Violation {
                address: account.address.clone(),
                field,
                kind,
            });
        }
    };

    check("address", lower_hex(&account.address));
    check("codeHash", lower_hex(&account.code_hash));
    check("root", lower_hex(&account.root));
    if let Some(code) = &account.code {
        check("code", lower_hex(code));
    }
    for (key, value) in account.storage.iter().flatten() {
        check("storage", lower_hex(key));
        check("storage", lower_hex(value));
    }
    check("balance", balance(account));

    violations
}

fn lower_hex(value: &str) -> Option<ViolationKind> {
    (!is_lower_hex(value)).then(|| ViolationKind::NotLowerHex(value.to_string()))
}

fn balance(account: &Account) -> Option<ViolationKind> {
    let balance = &account.balance;
    if balance.is_empty() || !balance.bytes().all(|b| b.is_ascii_digit()) {
        return Some(ViolationKind::NotDecimal(balance.clone()));
    }
    let is_zero = balance.trim_start_matches('0').is_empty();

    (!is_zero && !is_precompile(&account.address))
        .then(|| ViolationKind::NonZeroBalance(balance.clone()))
}
