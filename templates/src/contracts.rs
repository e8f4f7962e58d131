//! Contract source accessors, bound and ready to deploy.
//!
//! Utility interfaces have no dependencies and come back verbatim; the
//! others take the addresses of the contracts they import, in the order the
//! harness deploys them.

use coin_toss_common::Address;

use crate::{assets, bind, AddressBindings};

/// The FungibleToken standard interface.
pub fn fungible_token() -> Vec<u8> {
    assets::CONTRACT_FUNGIBLE_TOKEN.as_bytes().to_vec()
}

/// The NonFungibleToken standard interface.
pub fn non_fungible_token() -> Vec<u8> {
    assets::CONTRACT_NON_FUNGIBLE_TOKEN.as_bytes().to_vec()
}

/// The ViewResolver interface.
pub fn view_resolver() -> Vec<u8> {
    assets::CONTRACT_VIEW_RESOLVER.as_bytes().to_vec()
}

/// The MetadataViews contract, bound to its three dependencies.
pub fn metadata_views(
    fungible_token_address: Address,
    non_fungible_token_address: Address,
    view_resolver_address: Address,
) -> Vec<u8> {
    let bindings = AddressBindings::new()
        .with_fungible_token(fungible_token_address)
        .with_non_fungible_token(non_fungible_token_address)
        .with_view_resolver(view_resolver_address);

    bind(assets::CONTRACT_METADATA_VIEWS, &bindings).into_bytes()
}

/// The RandomBeaconHistory contract.
pub fn random_beacon_history() -> Vec<u8> {
    assets::CONTRACT_RANDOM_BEACON_HISTORY.as_bytes().to_vec()
}

/// The PseudoRandomGenerator contract.
pub fn pseudo_random_generator() -> Vec<u8> {
    assets::CONTRACT_PSEUDO_RANDOM_GENERATOR.as_bytes().to_vec()
}

/// The CoinToss contract, bound to its four dependencies.
pub fn coin_toss(
    fungible_token_address: Address,
    non_fungible_token_address: Address,
    random_beacon_history_address: Address,
    pseudo_random_generator_address: Address,
) -> Vec<u8> {
    let bindings = AddressBindings::new()
        .with_fungible_token(fungible_token_address)
        .with_non_fungible_token(non_fungible_token_address)
        .with_random_beacon_history(random_beacon_history_address)
        .with_pseudo_random_generator(pseudo_random_generator_address);

    bind(assets::CONTRACT_COIN_TOSS, &bindings).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_generator() -> impl FnMut() -> Address {
        let mut next = 0u64;
        move || {
            next += 1;
            Address::from_u64(next)
        }
    }

    #[test]
    fn test_random_beacon_history() {
        assert!(!random_beacon_history().is_empty());
    }

    #[test]
    fn test_pseudo_random_generator() {
        assert!(!pseudo_random_generator().is_empty());
    }

    #[test]
    fn test_metadata_views_binds_dependencies() {
        let mut addresses = address_generator();
        let ft = addresses();
        let nft = addresses();
        let resolver = addresses();

        let contract = String::from_utf8(metadata_views(ft, nft, resolver)).unwrap();
        assert!(contract.contains(&ft.to_string()));
        assert!(contract.contains(&nft.to_string()));
        assert!(contract.contains(&resolver.to_string()));
        assert!(!contract.contains("\"FungibleToken\""));
    }

    #[test]
    fn test_coin_toss_binds_dependencies() {
        let mut addresses = address_generator();
        let ft = addresses();
        let nft = addresses();
        let beacon = addresses();
        let prg = addresses();

        let contract = String::from_utf8(coin_toss(ft, nft, beacon, prg)).unwrap();
        assert!(contract.contains(&ft.to_string()));
        assert!(contract.contains(&nft.to_string()));
        assert!(contract.contains(&beacon.to_string()));
        assert!(contract.contains(&prg.to_string()));
    }
}
