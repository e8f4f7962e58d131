use coin_toss_common::Address;

// Placeholder tokens recognized in embedded sources, matched as literal
// quoted identifiers.
const PLACEHOLDER_NON_FUNGIBLE_TOKEN: &str = "\"NonFungibleToken\"";
const PLACEHOLDER_FUNGIBLE_TOKEN: &str = "\"FungibleToken\"";
const PLACEHOLDER_VIEW_RESOLVER: &str = "\"ViewResolver\"";
const PLACEHOLDER_METADATA_VIEWS: &str = "\"MetadataViews\"";
const PLACEHOLDER_RANDOM_BEACON_HISTORY: &str = "\"RandomBeaconHistory\"";
const PLACEHOLDER_PSEUDO_RANDOM_GENERATOR: &str = "\"PseudoRandomGenerator\"";
const PLACEHOLDER_COIN_TOSS: &str = "\"CoinToss\"";

/// One deployed address per recognized placeholder token.
///
/// Slots that do not apply to a template are left at [`Address::EMPTY`];
/// the substituted reference is syntactically valid but inert.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressBindings {
    pub non_fungible_token: Address,
    pub fungible_token: Address,
    pub view_resolver: Address,
    pub metadata_views: Address,
    pub random_beacon_history: Address,
    pub pseudo_random_generator: Address,
    pub coin_toss: Address,
}

impl AddressBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_non_fungible_token(mut self, address: Address) -> Self {
        self.non_fungible_token = address;
        self
    }

    pub fn with_fungible_token(mut self, address: Address) -> Self {
        self.fungible_token = address;
        self
    }

    pub fn with_view_resolver(mut self, address: Address) -> Self {
        self.view_resolver = address;
        self
    }

    pub fn with_metadata_views(mut self, address: Address) -> Self {
        self.metadata_views = address;
        self
    }

    pub fn with_random_beacon_history(mut self, address: Address) -> Self {
        self.random_beacon_history = address;
        self
    }

    pub fn with_pseudo_random_generator(mut self, address: Address) -> Self {
        self.pseudo_random_generator = address;
        self
    }

    pub fn with_coin_toss(mut self, address: Address) -> Self {
        self.coin_toss = address;
        self
    }

    fn pairs(&self) -> [(&'static str, Address); 7] {
        [
            (PLACEHOLDER_NON_FUNGIBLE_TOKEN, self.non_fungible_token),
            (PLACEHOLDER_FUNGIBLE_TOKEN, self.fungible_token),
            (PLACEHOLDER_VIEW_RESOLVER, self.view_resolver),
            (PLACEHOLDER_METADATA_VIEWS, self.metadata_views),
            (
                PLACEHOLDER_RANDOM_BEACON_HISTORY,
                self.random_beacon_history,
            ),
            (
                PLACEHOLDER_PSEUDO_RANDOM_GENERATOR,
                self.pseudo_random_generator,
            ),
            (PLACEHOLDER_COIN_TOSS, self.coin_toss),
        ]
    }
}

/// Replaces every placeholder token in `source` with `0x` + the lowercase
/// hex of its bound address.
///
/// The transform is a pure function of its inputs: substitution is
/// order-independent (each token is a distinct literal match), a token that
/// does not occur is a silent no-op, and no validation of the resulting
/// text happens here. Malformed output surfaces only when the network
/// rejects the deployment or execution.
pub fn bind(source: &str, bindings: &AddressBindings) -> String {
    let mut code = source.to_string();
    for (token, address) in bindings.pairs() {
        code = code.replace(token, &address.to_string());
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_replaces_each_occurrence() {
        let source = r#"import FungibleToken from "FungibleToken"
import PseudoRandomGenerator from "PseudoRandomGenerator""#;
        let bindings = AddressBindings::new()
            .with_fungible_token(Address::from_u64(0xee82856bf20e2aa6))
            .with_pseudo_random_generator(Address::from_u64(0x0ae53cb6e3f42a79));

        let bound = bind(source, &bindings);
        assert_eq!(
            bound,
            "import FungibleToken from 0xee82856bf20e2aa6\n\
             import PseudoRandomGenerator from 0x0ae53cb6e3f42a79"
        );
    }

    #[test]
    fn test_unused_slot_substitutes_empty_sentinel() {
        let source = r#"import CoinToss from "CoinToss""#;
        let bound = bind(source, &AddressBindings::new());
        assert_eq!(bound, "import CoinToss from 0x0000000000000000");
    }

    #[test]
    fn test_absent_token_is_a_no_op() {
        let source = "access(all) contract Unrelated {}";
        let bindings = AddressBindings::new().with_coin_toss(Address::from_u64(9));
        assert_eq!(bind(source, &bindings), source);
    }

    #[test]
    fn test_binding_is_idempotent() {
        let source = all_placeholder_fixture();
        let bindings = fixture_bindings();
        let once = bind(&source, &bindings);
        let twice = bind(&once, &bindings);
        assert_eq!(once, twice);
    }

    // A fixture exercising every placeholder token at once.
    fn all_placeholder_fixture() -> String {
        [
            "NonFungibleToken",
            "FungibleToken",
            "ViewResolver",
            "MetadataViews",
            "RandomBeaconHistory",
            "PseudoRandomGenerator",
            "CoinToss",
        ]
        .iter()
        .map(|name| format!("import {name} from \"{name}\""))
        .collect::<Vec<_>>()
        .join("\n")
    }

    fn fixture_bindings() -> AddressBindings {
        AddressBindings {
            non_fungible_token: Address::from_u64(1),
            fungible_token: Address::from_u64(2),
            view_resolver: Address::from_u64(3),
            metadata_views: Address::from_u64(4),
            random_beacon_history: Address::from_u64(5),
            pseudo_random_generator: Address::from_u64(6),
            coin_toss: Address::from_u64(7),
        }
    }

    proptest! {
        // Replacement text (0x + hex) can never match a quoted placeholder
        // token, so binding any source twice equals binding it once.
        #[test]
        fn prop_binding_idempotent_on_arbitrary_source(
            fragments in proptest::collection::vec(
                prop_oneof![
                    Just("\"NonFungibleToken\"".to_string()),
                    Just("\"FungibleToken\"".to_string()),
                    Just("\"ViewResolver\"".to_string()),
                    Just("\"MetadataViews\"".to_string()),
                    Just("\"RandomBeaconHistory\"".to_string()),
                    Just("\"PseudoRandomGenerator\"".to_string()),
                    Just("\"CoinToss\"".to_string()),
                    "[a-zA-Z0-9 _(){}:.\\n]{0,40}",
                ],
                0..16,
            ),
            addresses in proptest::array::uniform7(any::<u64>()),
        ) {
            let source = fragments.concat();
            let bindings = AddressBindings {
                non_fungible_token: Address::from_u64(addresses[0]),
                fungible_token: Address::from_u64(addresses[1]),
                view_resolver: Address::from_u64(addresses[2]),
                metadata_views: Address::from_u64(addresses[3]),
                random_beacon_history: Address::from_u64(addresses[4]),
                pseudo_random_generator: Address::from_u64(addresses[5]),
                coin_toss: Address::from_u64(addresses[6]),
            };

            let once = bind(&source, &bindings);
            let twice = bind(&once, &bindings);
            prop_assert_eq!(once, twice);
        }
    }
}
