//! Authenticated sealing: sign-then-seal and unseal-then-verify.
//!
//! The detached signature and the signer's receiver id travel under reserved
//! custom-parameter keys. Since parameters are encrypted under the content
//! key, both are confidentiality-protected by the envelope itself. The
//! signature is computed over the plaintext *before* sealing; on the way
//! back, verification failure discards the decrypted payload, so a caller
//! never receives data that did not verify.

use crate::artifacts::{PrivateKey, PublicKey, ReceiverId, Signature};
use crate::client::mem::{SealerMemoryConfig, UnsealerMemoryConfig};
use crate::client::{Sealer, Unsealer};
use crate::consts::RECEIVER_ID_SIZE;
use crate::error::Error;
use crate::params::CustomParams;
use crate::recipients::RecipientSet;
use crate::signer;

use rand::{CryptoRng, RngCore};

/// Reserved parameter key holding the detached payload signature.
pub const SIGNATURE_PARAM: &str = "data-signature";

/// Reserved parameter key holding the signer's receiver id.
pub const SIGNER_ID_PARAM: &str = "data-signer-id";

/// Signs `message` with `key`, embeds the signature and the signer's
/// receiver id into the custom parameters, and seals everything for the
/// given recipients.
pub fn seal_signed<R: RngCore + CryptoRng>(
    message: &[u8],
    key: &PrivateKey,
    recipients: &RecipientSet,
    mut params: CustomParams,
    rng: &mut R,
) -> Result<Vec<u8>, Error> {
    let sig = signer::sign(message, key)?;

    params.set_data(SIGNATURE_PARAM, &sig.to_bytes());
    params.set_data(SIGNER_ID_PARAM, key.receiver_id().as_bytes());

    Sealer::<_, SealerMemoryConfig>::new(recipients, rng)?
        .with_params(params)
        .seal(message)
}

/// Unseals `input` with `key` and verifies the embedded signature against
/// the candidate public keys.
///
/// With exactly one candidate, that key verifies. With several, the
/// embedded signer id selects the candidate ([`Error::SignerNotFound`] if
/// none matches). Verification failure yields [`Error::InvalidSignature`]
/// and the plaintext is discarded.
pub fn unseal_verified(
    input: &[u8],
    key: &PrivateKey,
    candidates: &[PublicKey],
) -> Result<Vec<u8>, Error> {
    let unsealer = Unsealer::<_, UnsealerMemoryConfig>::new(input)?;
    let (message, params) = unsealer.unseal(&key.receiver_id(), key)?;

    let sig_bytes = params.data(SIGNATURE_PARAM).ok_or_else(|| {
        Error::MalformedEnvelope("missing embedded signature".to_string())
    })?;
    let sig = Signature::from_slice(sig_bytes)?;

    let verifier = match candidates {
        [] => return Err(Error::SignerNotFound),
        [only] => only,
        _ => {
            let id_bytes = params
                .data(SIGNER_ID_PARAM)
                .and_then(|v| <[u8; RECEIVER_ID_SIZE]>::try_from(v).ok())
                .ok_or(Error::SignerNotFound)?;
            let signer_id = ReceiverId::from_bytes(id_bytes);

            candidates
                .iter()
                .find(|c| c.receiver_id() == signer_id)
                .ok_or(Error::SignerNotFound)?
        }
    };

    if !signer::verify(&message, &sig, verifier) {
        return Err(Error::InvalidSignature);
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestSetup;

    fn bob_only(setup: &TestSetup) -> RecipientSet {
        let mut recipients = RecipientSet::new();
        recipients.add_key(setup.bob.public()).unwrap();
        recipients
    }

    #[test]
    fn test_seal_signed_roundtrip() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let message = b"signed and sealed";
        let sealed = seal_signed(
            message,
            setup.alice.private(),
            &bob_only(&setup),
            CustomParams::new(),
            &mut rng,
        )
        .unwrap();

        let plain = unseal_verified(
            &sealed,
            setup.bob.private(),
            &[setup.alice.public().clone()],
        )
        .unwrap();

        assert_eq!(&plain, message);
    }

    #[test]
    fn test_signer_selection_by_embedded_id() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let sealed = seal_signed(
            b"from alice",
            setup.alice.private(),
            &bob_only(&setup),
            CustomParams::new(),
            &mut rng,
        )
        .unwrap();

        // Mallory is listed first; the embedded signer id must still select
        // Alice's key.
        let candidates = [setup.mallory.public().clone(), setup.alice.public().clone()];
        let plain = unseal_verified(&sealed, setup.bob.private(), &candidates).unwrap();

        assert_eq!(&plain, b"from alice");
    }

    #[test]
    fn test_signer_not_found() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let sealed = seal_signed(
            b"from alice",
            setup.alice.private(),
            &bob_only(&setup),
            CustomParams::new(),
            &mut rng,
        )
        .unwrap();

        let candidates = [
            setup.mallory.public().clone(),
            setup.charlie.public().clone(),
        ];
        let res = unseal_verified(&sealed, setup.bob.private(), &candidates);
        assert!(matches!(res, Err(Error::SignerNotFound)));

        let res = unseal_verified(&sealed, setup.bob.private(), &[]);
        assert!(matches!(res, Err(Error::SignerNotFound)));
    }

    #[test]
    fn test_wrong_single_candidate_fails_verification() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let sealed = seal_signed(
            b"from alice",
            setup.alice.private(),
            &bob_only(&setup),
            CustomParams::new(),
            &mut rng,
        )
        .unwrap();

        let res = unseal_verified(
            &sealed,
            setup.bob.private(),
            &[setup.mallory.public().clone()],
        );

        assert!(matches!(res, Err(Error::InvalidSignature)));
    }

    #[test]
    fn test_tampered_ciphertext_never_yields_plaintext() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let sealed = seal_signed(
            b"from alice",
            setup.alice.private(),
            &bob_only(&setup),
            CustomParams::new(),
            &mut rng,
        )
        .unwrap();

        for i in (0..sealed.len()).step_by(97) {
            let mut corrupted = sealed.clone();
            corrupted[i] = !corrupted[i];

            let res = unseal_verified(
                &corrupted,
                setup.bob.private(),
                &[setup.alice.public().clone()],
            );

            assert!(matches!(
                res,
                Err(Error::DecryptionFailed)
                    | Err(Error::InvalidSignature)
                    | Err(Error::MalformedEnvelope(_))
                    | Err(Error::RecipientNotFound)
            ));
        }
    }

    #[test]
    fn test_plain_unseal_still_exposes_params() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let mut params = CustomParams::new();
        params.set_string("note", "carried along");

        let sealed = seal_signed(
            b"payload",
            setup.alice.private(),
            &bob_only(&setup),
            params,
            &mut rng,
        )
        .unwrap();

        let (_, params) = Unsealer::<_, UnsealerMemoryConfig>::new(sealed)
            .unwrap()
            .unseal(&setup.bob.public().receiver_id(), setup.bob.private())
            .unwrap();

        assert_eq!(params.string("note"), Some("carried along"));
        assert!(params.data(SIGNATURE_PARAM).is_some());
        assert!(params.data(SIGNER_ID_PARAM).is_some());
    }
}
