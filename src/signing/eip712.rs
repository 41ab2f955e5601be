//! EIP-712 hashing for EIP-3009 `TransferWithAuthorization`.

use super::account::{keccak256, Address};

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const TRANSFER_TYPE: &str = "TransferWithAuthorization(address from,address to,uint256 value,uint256 validAfter,uint256 validBefore,bytes32 nonce)";

#[derive(Debug, Clone)]
pub struct Eip712Domain<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferAuthorization {
    pub from: Address,
    pub to: Address,
    pub value: u128,
    pub valid_after: u64,
    pub valid_before: u64,
    pub nonce: [u8; 32],
}

fn word_u128(v: u128) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[16..].copy_from_slice(&v.to_be_bytes());
    w
}

fn word_address(a: &Address) -> [u8; 32] {
    let mut w = [0u8; 32];
    w[12..].copy_from_slice(a);
    w
}

fn hash_words(words: &[[u8; 32]]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(words.len() * 32);
    for w in words {
        buf.extend_from_slice(w);
    }
    keccak256(&buf)
}

impl Eip712Domain<'_> {
    pub fn separator(&self) -> [u8; 32] {
        hash_words(&[
            keccak256(DOMAIN_TYPE.as_bytes()),
            keccak256(self.name.as_bytes()),
            keccak256(self.version.as_bytes()),
            word_u128(u128::from(self.chain_id)),
            word_address(&self.verifying_contract),
        ])
    }
}

impl TransferAuthorization {
    pub fn struct_hash(&self) -> [u8; 32] {
        hash_words(&[
            keccak256(TRANSFER_TYPE.as_bytes()),
            word_address(&self.from),
            word_address(&self.to),
            word_u128(self.value),
            word_u128(u128::from(self.valid_after)),
            word_u128(u128::from(self.valid_before)),
            self.nonce,
        ])
    }
}

/// `keccak256(0x19 0x01 || domainSeparator || structHash)`
pub fn signing_hash(domain: &Eip712Domain<'_>, auth: &TransferAuthorization) -> [u8; 32] {
    let mut buf = Vec::with_capacity(66);
    buf.extend_from_slice(&[0x19, 0x01]);
    buf.extend_from_slice(&domain.separator());
    buf.extend_from_slice(&auth.struct_hash());
    keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::account::parse_address;

    #[test]
    fn domain_separator_matches_reference_mail_example() {
        let domain = Eip712Domain {
            name: "Ether Mail",
            version: "1",
            chain_id: 1,
            verifying_contract: parse_address("0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC").unwrap(),
        };
        assert_eq!(
            hex::encode(domain.separator()),
            "f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f"
        );
    }

    fn auth() -> TransferAuthorization {
        TransferAuthorization {
            from: [0x11; 20],
            to: [0x22; 20],
            value: 1000,
            valid_after: 1_700_000_000,
            valid_before: 1_700_000_060,
            nonce: [0x33; 32],
        }
    }

    #[test]
    fn signing_hash_binds_the_chain() {
        let base = Eip712Domain { name: "USD Coin", version: "2", chain_id: 8453, verifying_contract: [0xaa; 20] };
        let sepolia = Eip712Domain { chain_id: 84532, ..base.clone() };
        assert_ne!(signing_hash(&base, &auth()), signing_hash(&sepolia, &auth()));
    }

    #[test]
    fn signing_hash_binds_every_field() {
        let domain = Eip712Domain { name: "USDC", version: "2", chain_id: 84532, verifying_contract: [0xaa; 20] };
        let reference = signing_hash(&domain, &auth());
        let mut bumped = auth();
        bumped.value += 1;
        assert_ne!(reference, signing_hash(&domain, &bumped));
        let mut renonced = auth();
        renonced.nonce[0] = 0;
        assert_ne!(reference, signing_hash(&domain, &renonced));
        assert_eq!(reference, signing_hash(&domain, &auth()));
    }

    #[test]
    fn words_are_left_padded() {
        assert_eq!(word_u128(1)[31], 1);
        assert!(word_u128(1)[..31].iter().all(|b| *b == 0));
        assert_eq!(&word_address(&[0xff; 20])[..12], &[0u8; 12]);
    }
}
