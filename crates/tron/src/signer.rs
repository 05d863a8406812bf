use crate::error::{Error, Result};
use crate::node::{RawTransaction, SignedTransaction};
use k256::ecdsa::SigningKey;

/// Signs a node-issued unsigned transaction and produces the broadcast
/// envelope.
///
/// The digest signed is the raw `txID` bytes: the id is itself a content
/// hash produced by the node, and this client does not recompute it. A node
/// that returned an id inconsistent with its own raw_data would yield a
/// transaction the network rejects, and there is no independent way to
/// detect that here.
pub fn sign_raw_transaction(tx: &RawTransaction, key: &SigningKey) -> Result<SignedTransaction> {
    let digest = hex::decode(&tx.tx_id).map_err(|e| Error::decode("txID", e))?;
    if digest.len() != 32 {
        return Err(Error::decode(
            "txID",
            format!("{} bytes, expected 32", digest.len()),
        ));
    }

    let (sig, recid) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| Error::Signing {
            message: e.to_string(),
        })?;
    let mut sig65 = sig.to_bytes().to_vec();
    sig65.push(recid.to_byte());

    // Re-serialize raw_data to its string form rather than trusting the
    // node's original text; broadcast always goes out non-visible.
    let raw_data = serde_json::to_string(&tx.raw_data).map_err(|e| Error::Signing {
        message: format!("serialize raw_data: {e}"),
    })?;

    Ok(SignedTransaction {
        visible: false,
        tx_id: tx.tx_id.clone(),
        raw_data,
        raw_data_hex: tx.raw_data_hex.clone(),
        signature: vec![hex::encode(sig65)],
    })
}
