//! Parsed form of submitted source text.
//!
//! The emulator does not interpret the contract language. It reads just
//! enough structure to route a call: the import table, the declared
//! contract name, and the single `Contract.method(...)` entry call of a
//! script or transaction body. Everything else in the payload is opaque.

use std::str::FromStr;

use coin_toss_common::Address;

use crate::error::EmulatorError;

/// What a payload declares itself to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Declares a contract (or contract interface).
    Contract,
    /// Declares a `fun main(...)` entry point.
    Script,
    /// Declares a `transaction(...)` block.
    Transaction,
}

/// Where an import points after templating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// Bound to a concrete address.
    Address(Address),
    /// Still in the quoted placeholder form.
    Unresolved(String),
}

#[derive(Debug, Clone)]
pub struct Import {
    pub name: String,
    pub target: ImportTarget,
}

/// The entry call a script or transaction routes to.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Import name of the contract being called.
    pub contract: String,
    pub method: String,
}

#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub kind: SourceKind,
    pub imports: Vec<Import>,
    /// Declared contract name, for `SourceKind::Contract`.
    pub contract_name: Option<String>,
    /// Entry call, for scripts and transactions.
    pub dispatch: Option<Dispatch>,
}

/// Parses a submitted payload.
///
/// # Errors
///
/// Returns [`EmulatorError::Rejected`] for payloads that are not UTF-8,
/// have malformed import lines, or declare none of the recognized forms.
pub fn parse(bytes: &[u8]) -> Result<ParsedSource, EmulatorError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| EmulatorError::rejected("source is not valid UTF-8"))?;

    let mut imports = Vec::new();
    let mut kind = None;
    let mut contract_name = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(rest) = line.strip_prefix("import ") {
            imports.push(parse_import(rest, line)?);
            continue;
        }

        if kind.is_none() {
            if let Some(name) = parse_contract_declaration(line) {
                kind = Some(SourceKind::Contract);
                contract_name = Some(name);
            } else if line.contains("fun main(") {
                kind = Some(SourceKind::Script);
            } else if line.starts_with("transaction(") || line.starts_with("transaction {") {
                kind = Some(SourceKind::Transaction);
            }
        }
    }

    let kind = kind.ok_or_else(|| {
        EmulatorError::rejected("source declares no contract, script or transaction")
    })?;

    let dispatch = match kind {
        SourceKind::Contract => None,
        SourceKind::Script | SourceKind::Transaction => Some(parse_dispatch(text, &imports)?),
    };

    Ok(ParsedSource {
        kind,
        imports,
        contract_name,
        dispatch,
    })
}

// `<Name> from 0x<hex>` or `<Name> from "<Name>"`
fn parse_import(rest: &str, line: &str) -> Result<Import, EmulatorError> {
    let mut tokens = rest.split_whitespace();
    let (name, from, target) = match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(name), Some(from), Some(target), None) => (name, from, target),
        _ => return Err(EmulatorError::rejected(format!("malformed import: {line}"))),
    };
    if from != "from" {
        return Err(EmulatorError::rejected(format!("malformed import: {line}")));
    }

    let target = if let Some(hex) = target.strip_prefix("0x") {
        let address = Address::from_str(hex)
            .map_err(|_| EmulatorError::rejected(format!("malformed import address: {line}")))?;
        ImportTarget::Address(address)
    } else if target.len() >= 2 && target.starts_with('"') && target.ends_with('"') {
        ImportTarget::Unresolved(target[1..target.len() - 1].to_string())
    } else {
        return Err(EmulatorError::rejected(format!(
            "malformed import target: {line}"
        )));
    };

    Ok(Import {
        name: name.to_string(),
        target,
    })
}

// `... contract <Name> {` / `... contract interface <Name> {`
fn parse_contract_declaration(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if token == "contract" {
            let mut name = tokens.next()?;
            if name == "interface" {
                name = tokens.next()?;
            }
            return Some(name.trim_end_matches('{').trim_end_matches(':').to_string());
        }
    }
    None
}

// First `<importName>.<method>(` occurrence outside comments and imports.
fn parse_dispatch(text: &str, imports: &[Import]) -> Result<Dispatch, EmulatorError> {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with("import ") {
            continue;
        }
        for import in imports {
            if let Some(method) = find_call(line, &import.name) {
                return Ok(Dispatch {
                    contract: import.name.clone(),
                    method,
                });
            }
        }
    }
    Err(EmulatorError::rejected(
        "script or transaction calls none of its imports",
    ))
}

fn find_call(line: &str, contract: &str) -> Option<String> {
    let needle = format!("{contract}.");
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(&needle) {
        let pos = search_from + offset;
        search_from = pos + needle.len();

        // Word boundary on the left, otherwise e.g. "MyCoinToss." matches
        // a "CoinToss" import.
        if pos > 0 {
            let before = line[..pos].chars().next_back();
            if matches!(before, Some(c) if c.is_alphanumeric() || c == '_') {
                continue;
            }
        }

        let rest = &line[pos + needle.len()..];
        let method: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !method.is_empty() && rest[method.len()..].starts_with('(') {
            return Some(method);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contract() {
        let source = b"access(all) contract PseudoRandomGenerator {\n}\n";
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.kind, SourceKind::Contract);
        assert_eq!(
            parsed.contract_name.as_deref(),
            Some("PseudoRandomGenerator")
        );
        assert!(parsed.dispatch.is_none());
    }

    #[test]
    fn test_parse_contract_interface() {
        let source = b"access(all) contract interface FungibleToken {\n}\n";
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.kind, SourceKind::Contract);
        assert_eq!(parsed.contract_name.as_deref(), Some("FungibleToken"));
    }

    #[test]
    fn test_parse_script_with_resolved_import() {
        let source = b"import PseudoRandomGenerator from 0x0000000000000003\n\n\
            access(all) fun main(seed: [UInt8], salt: UInt64): UInt64 {\n\
            \x20   return PseudoRandomGenerator.nextUInt64NewPRG(seed: seed, salt: salt)\n\
            }\n";
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.kind, SourceKind::Script);
        assert_eq!(parsed.imports.len(), 1);
        assert_eq!(
            parsed.imports[0].target,
            ImportTarget::Address(coin_toss_common::Address::from_u64(3))
        );
        let dispatch = parsed.dispatch.unwrap();
        assert_eq!(dispatch.contract, "PseudoRandomGenerator");
        assert_eq!(dispatch.method, "nextUInt64NewPRG");
    }

    #[test]
    fn test_parse_transaction() {
        let source = b"import CoinToss from 0x0000000000000009\n\n\
            transaction(amount: UInt64) {\n\
            \x20   prepare(signer: auth(Storage) &Account) {\n\
            \x20       CoinToss.flipCoin(amount: amount)\n\
            \x20   }\n\
            }\n";
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.kind, SourceKind::Transaction);
        let dispatch = parsed.dispatch.unwrap();
        assert_eq!(dispatch.contract, "CoinToss");
        assert_eq!(dispatch.method, "flipCoin");
    }

    #[test]
    fn test_unresolved_import_is_kept() {
        let source = b"import CoinToss from \"CoinToss\"\n\
            access(all) fun main(): UInt64 {\n\
            \x20   return CoinToss.getPrizePool()\n\
            }\n";
        let parsed = parse(source).unwrap();
        assert_eq!(
            parsed.imports[0].target,
            ImportTarget::Unresolved("CoinToss".to_string())
        );
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = parse(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(reason) if reason.contains("UTF-8")));
    }

    #[test]
    fn test_malformed_import_rejected() {
        let err = parse(b"import CoinToss\nfun main(): UInt64 {}\n").unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(reason) if reason.contains("import")));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = parse(b"// nothing here\n").unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(_)));
    }

    #[test]
    fn test_call_requires_word_boundary() {
        assert_eq!(find_call("MyCoinToss.flipCoin(x)", "CoinToss"), None);
        assert_eq!(
            find_call("CoinToss.flipCoin(x)", "CoinToss"),
            Some("flipCoin".to_string())
        );
    }
}
