use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::user::{AuthResponse, RegisterRequest, VerifyOtpRequest};
use crate::services::api::ElevateApi;

pub const OTP_LEN: usize = 6;

/// Countdown restart value after a successful resend.
pub const RESEND_COUNTDOWN_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPhase {
    AwaitingInput,
    Verified,
}

/// One in-progress email verification: the entered code, the resend
/// countdown, and the in-flight flag the UI layer checks to disable the
/// verify and resend controls while a call is outstanding. Created when the
/// verification screen opens, consumed on successful verification or
/// abandoned with the countdown task torn down.
pub struct OtpSession {
    api: Arc<dyn ElevateApi>,
    registration: RegisterRequest,
    code: String,
    countdown: u32,
    resend_ready: bool,
    in_flight: bool,
    phase: OtpPhase,
}

impl OtpSession {
    pub fn new(
        api: Arc<dyn ElevateApi>,
        registration: RegisterRequest,
        countdown_secs: u32,
    ) -> Self {
        Self {
            api,
            registration,
            code: String::new(),
            countdown: countdown_secs,
            resend_ready: countdown_secs == 0,
            in_flight: false,
            phase: OtpPhase::AwaitingInput,
        }
    }

    pub fn email(&self) -> &str {
        &self.registration.email
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.countdown
    }

    pub fn can_resend(&self) -> bool {
        self.resend_ready
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> OtpPhase {
        self.phase
    }

    /// Normalization happens as the user types: non-digits are stripped and
    /// the result capped at six digits.
    pub fn push_input(&mut self, raw: &str) {
        self.code = raw
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(OTP_LEN)
            .collect();
    }

    /// One second elapsed. Returns false once the countdown has reached zero
    /// and the ticking task should halt.
    pub fn tick(&mut self) -> bool {
        if self.countdown > 0 {
            self.countdown -= 1;
            if self.countdown == 0 {
                self.resend_ready = true;
            }
        }
        self.countdown > 0
    }

    pub async fn verify(&mut self) -> Result<AuthResponse> {
        if self.phase == OtpPhase::Verified {
            return Err(AppError::session("Session already verified"));
        }

        let request = VerifyOtpRequest {
            email: self.registration.email.clone(),
            otp: self.code.clone(),
        };
        request.validate()?;

        self.in_flight = true;
        let outcome = self.api.verify_otp(&request).await;
        self.in_flight = false;

        match outcome {
            Ok(auth) => {
                self.phase = OtpPhase::Verified;
                tracing::info!(email = %self.registration.email, "email verified");
                Ok(auth)
            }
            // The entered code is kept on rejection so the user can correct
            // a typo instead of retyping all six digits.
            Err(AppError::Remote { status, .. }) if (400..500).contains(&status) => {
                Err(AppError::InvalidOtp)
            }
            Err(e) => {
                tracing::warn!("OTP verification failed: {}", e);
                Err(e)
            }
        }
    }

    /// Re-issue the registration request so a fresh code is delivered. Only
    /// valid once the countdown has run out; a failed resend leaves the
    /// session unchanged and still eligible.
    pub async fn resend(&mut self) -> Result<()> {
        if self.phase == OtpPhase::Verified {
            return Err(AppError::session("Session already verified"));
        }
        if !self.resend_ready {
            return Err(AppError::ResendNotReady);
        }

        self.in_flight = true;
        let outcome = self.api.request_otp(&self.registration).await;
        self.in_flight = false;

        match outcome {
            Ok(()) => {
                self.countdown = RESEND_COUNTDOWN_SECS;
                self.resend_ready = false;
                tracing::info!(email = %self.registration.email, "OTP resent");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to resend OTP: {}", e);
                Err(e)
            }
        }
    }
}

/// Owns the ticking task for one session. Dropping the handle cancels the
/// task, so abandoning the verification screen cannot leak periodic work.
pub struct CountdownHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Tick the session once per second until it reaches zero, the handle is
/// dropped, or `shutdown` is awaited. After a successful resend the caller
/// spawns a fresh countdown; a halted task never restarts itself.
pub fn spawn_countdown(session: Arc<Mutex<OtpSession>>) -> CountdownHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // the first tick resolves immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    let mut session = session.lock().await;
                    if !session.tick() {
                        break;
                    }
                }
            }
        }
    });

    CountdownHandle {
        cancel,
        task: Some(task),
    }
}
