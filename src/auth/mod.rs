mod verifier;

pub use verifier::{AssertionVerifier, PersonaVerifier, VERIFIER_URL};
