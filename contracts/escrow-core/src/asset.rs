use soroban_sdk::{contracterror, contracttype, Address, Env};

/// The asset a bounty is denominated in.
///
/// `Native` is the sentinel for the chain's base asset; it resolves to the
/// Stellar Asset Contract address the protocol was initialized with. `Token`
/// carries the contract address of any other standard fungible token. Both
/// variants move value through the same token interface, so the ledger can
/// treat deposits and payouts uniformly.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    Native,
    Token(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AssetError {
    MustBeContractAddress = 200,
}

impl Asset {
    /// Resolve to the token contract address value moves through.
    pub fn token_address(&self, native_asset: &Address) -> Address {
        match self {
            Asset::Native => native_asset.clone(),
            Asset::Token(addr) => addr.clone(),
        }
    }
}

/// Validates an asset before it is bound to a bounty id.
///
/// Token identifiers must be Soroban contract addresses (strkey `C...`);
/// account addresses cannot implement the token interface. The native
/// sentinel carries no address and is always valid.
pub fn validate_asset(env: &Env, asset: &Asset) -> Result<(), AssetError> {
    match asset {
        Asset::Native => Ok(()),
        Asset::Token(addr) => validate_token_address(env, addr),
    }
}

fn validate_token_address(env: &Env, addr: &Address) -> Result<(), AssetError> {
    let _ = env;
    let strkey = addr.to_string();
    if strkey.len() != 56 {
        return Err(AssetError::MustBeContractAddress);
    }

    let mut bytes = [0u8; 56];
    strkey.copy_into_slice(&mut bytes);
    if bytes[0] == b'C' {
        Ok(())
    } else {
        Err(AssetError::MustBeContractAddress)
    }
}
