pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Decides whether a credential typed by the user is acceptable.
pub trait CredentialVerifier {
    fn verify(&self, input: &str) -> bool;
}

/// A fixed PIN compared in plaintext.
#[derive(Debug, Clone)]
pub struct FixedPin {
    pin: String,
}

impl FixedPin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }
}

impl CredentialVerifier for FixedPin {
    fn verify(&self, input: &str) -> bool {
        input == self.pin
    }
}

impl<F> CredentialVerifier for F
where
    F: Fn(&str) -> bool,
{
    fn verify(&self, input: &str) -> bool {
        self(input)
    }
}

/// Where the gate reads PIN attempts from and reports rejections to.
pub trait PinPrompt {
    /// Read one attempt. `None` means the input was closed or cancelled.
    fn read_pin(&mut self) -> Option<String>;

    /// Called after a rejected attempt with the number of attempts left.
    fn rejected(&mut self, remaining: u32);
}

/// Retry-counting gate in front of the tracker.
#[derive(Debug, Clone)]
pub struct PinGate<V> {
    verifier: V,
    max_attempts: u32,
}

impl<V: CredentialVerifier> PinGate<V> {
    pub fn new(verifier: V) -> Self {
        Self::with_attempts(verifier, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_attempts(verifier: V, max_attempts: u32) -> Self {
        Self {
            verifier,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Prompt until a PIN is accepted or the attempts run out.
    ///
    /// A closed prompt counts as a failed attempt.
    pub fn authenticate<P: PinPrompt>(&self, prompt: &mut P) -> bool {
        let mut remaining = self.max_attempts;
        while remaining > 0 {
            let accepted = prompt
                .read_pin()
                .is_some_and(|input| self.verifier.verify(&input));
            if accepted {
                tracing::info!("PIN accepted");
                return true;
            }

            remaining -= 1;
            tracing::warn!(remaining, "PIN rejected");
            prompt.rejected(remaining);
        }
        false
    }
}
