use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use validator::Validate;

use elevate_client::config::ClientConfig;
use elevate_client::models::feed::ItemKind;
use elevate_client::models::user::{CurrentUser, RegisterRequest};
use elevate_client::services::api::{ElevateApi, ElevateHttpApi};
use elevate_client::services::comments::CommentThread;
use elevate_client::services::missions::MissionBoard;
use elevate_client::services::otp::{spawn_countdown, OtpSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = ClientConfig::from_env()?;
    let api = Arc::new(ElevateHttpApi::new(&config)?);
    let api_dyn: Arc<dyn ElevateApi> = api.clone();

    tracing::info!("🚀 ELEVATE client starting against {}", config.api_base_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let registration = RegisterRequest {
        name: prompt(&mut lines, "Name: ").await?,
        email: prompt(&mut lines, "Email: ").await?,
        password: prompt(&mut lines, "Password: ").await?,
    };
    registration.validate()?;

    api.request_otp(&registration).await?;
    tracing::info!("✅ OTP sent to {}", registration.email);

    let session = Arc::new(Mutex::new(OtpSession::new(
        api_dyn.clone(),
        registration,
        config.otp_countdown_secs,
    )));
    let mut countdown = Some(spawn_countdown(session.clone()));

    let auth = loop {
        let (remaining, can_resend) = {
            let s = session.lock().await;
            (s.seconds_remaining(), s.can_resend())
        };
        let label = if can_resend {
            "Enter code, or 'resend' > ".to_string()
        } else {
            format!("Enter code ({}s until resend) > ", remaining)
        };
        let input = prompt(&mut lines, &label).await?;

        if input.trim() == "resend" {
            let mut s = session.lock().await;
            match s.resend().await {
                Ok(()) => {
                    tracing::info!("✅ A new code is on its way to {}", s.email());
                    drop(s);
                    // the halted countdown task never restarts itself
                    if let Some(handle) = countdown.take() {
                        handle.shutdown().await;
                    }
                    countdown = Some(spawn_countdown(session.clone()));
                }
                Err(e) => tracing::warn!("❌ {}", e),
            }
            continue;
        }

        let mut s = session.lock().await;
        s.push_input(input.trim());
        match s.verify().await {
            Ok(auth) => break auth,
            Err(e) => tracing::warn!("❌ {}", e),
        }
    };

    if let Some(handle) = countdown.take() {
        handle.shutdown().await;
    }
    api.set_token(auth.token.clone());
    tracing::info!("✅ Signed in as {} ({:?})", auth.user.name, auth.user.role);

    // Best-effort: a failed prefetch never blocks sign-in.
    match api.list_notifications().await {
        Ok(notifications) => {
            let unread = notifications.iter().filter(|n| !n.read).count();
            tracing::info!("🔔 {} unread notifications", unread);
        }
        Err(e) => tracing::warn!("Notification prefetch failed: {}", e),
    }

    let user = CurrentUser {
        id: auth.user.id.clone(),
        name: auth.user.name.clone(),
        email: auth.user.email.clone(),
        role: auth.user.role,
        avatar: None,
    };

    let mut board = MissionBoard::new(api_dyn.clone(), user.clone());
    board.load().await?;
    tracing::info!("📋 {} missions on the board", board.missions().len());
    for mission in board.missions().iter().take(5) {
        println!("  [{}] {}", mission.id, mission.title);
    }

    if user.role.can_comment() {
        if let Some(mission_id) = board.missions().first().map(|m| m.id.clone()) {
            let text = prompt(&mut lines, "Comment on the first mission (empty to skip) > ").await?;
            if !text.trim().is_empty() {
                let mut thread =
                    CommentThread::new(api_dyn.clone(), user.clone(), ItemKind::Mission, mission_id);
                thread.load().await?;
                thread.set_draft(text);
                match thread.submit().await {
                    Ok(()) => {
                        tracing::info!("✅ Comment posted ({} in thread)", thread.comments().len())
                    }
                    Err(e) => tracing::warn!("❌ {}", e),
                }
            }
        }
    }

    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}
