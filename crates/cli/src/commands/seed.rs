//! Seed sample task-completion records for manual testing.
//!
//! Signs in with a real account and writes a fixed set of nine task
//! completions (with per-step timings and scores) under
//! `users/<uid>/taskHistory`, enough to exercise the History tab and
//! performance tracking in the app.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use tracing::{error, info};

use stepahead_core::Email;
use stepahead_gateway::config::GatewayConfig;
use stepahead_gateway::firebase::FirebaseAuthClient;
use stepahead_gateway::firestore::{FirestoreClient, timestamp_value};
use stepahead_gateway::provider::{Identity, IdentityProvider};
use stepahead_gateway::store::{DocumentStore, MergeMode};

/// One sample task completion.
struct SeedTask {
    task_name: &'static str,
    task_icon: &'static str,
    day_of_week: u8,
    /// Actual time for each step (seconds).
    step_times: &'static [f64],
    /// Expected time for each step (seconds).
    estimated_times: &'static [f64],
    total_score: u32,
    days_ago: i64,
    is_bonus: bool,
}

/// The fixed sample data set: nine completions across five tasks, spread
/// over the past week.
fn sample_completions() -> Vec<SeedTask> {
    let task = |task_name,
                task_icon,
                day_of_week,
                step_times,
                estimated_times,
                total_score,
                days_ago,
                is_bonus| SeedTask {
        task_name,
        task_icon,
        day_of_week,
        step_times,
        estimated_times,
        total_score,
        days_ago,
        is_bonus,
    };

    vec![
        task(
            "Make Your Bed",
            "🛏️",
            1,
            &[28.5, 19.2, 14.8, 9.5][..],
            &[30.0, 20.0, 15.0, 10.0][..],
            95,
            0,
            false,
        ),
        task(
            "Make Your Bed",
            "🛏️",
            1,
            &[35.2, 22.1, 17.3, 12.8][..],
            &[30.0, 20.0, 15.0, 10.0][..],
            85,
            1,
            false,
        ),
        task(
            "Make Your Bed",
            "🛏️",
            1,
            &[32.0, 18.5, 15.2, 10.3][..],
            &[30.0, 20.0, 15.0, 10.0][..],
            92,
            2,
            false,
        ),
        task(
            "Wash Your Breakfast Dishes",
            "🍽️",
            1,
            &[18.2, 9.5, 14.1, 55.3, 28.7, 19.2][..],
            &[20.0, 10.0, 15.0, 60.0, 30.0, 20.0][..],
            98,
            0,
            false,
        ),
        task(
            "Wash Your Breakfast Dishes",
            "🍽️",
            1,
            &[22.5, 11.2, 16.8, 68.1, 35.2, 23.4][..],
            &[20.0, 10.0, 15.0, 60.0, 30.0, 20.0][..],
            82,
            1,
            false,
        ),
        task(
            "Water One Plant",
            "🌱",
            1,
            &[14.2, 28.5, 18.9, 29.1, 9.3][..],
            &[15.0, 30.0, 20.0, 30.0, 10.0][..],
            97,
            0,
            false,
        ),
        task(
            "Water One Plant",
            "🌱",
            1,
            &[18.5, 35.2, 25.1, 38.7, 12.5][..],
            &[15.0, 30.0, 20.0, 30.0, 10.0][..],
            78,
            3,
            false,
        ),
        task(
            "Take Out the Trash",
            "🗑️",
            2,
            &[25.3, 32.1, 45.8, 28.2, 35.7, 22.1][..],
            &[30.0, 30.0, 60.0, 30.0, 30.0, 30.0][..],
            88,
            6,
            false,
        ),
        task(
            "Organize Desk",
            "⭐",
            1,
            &[58.3][..],
            &[60.0][..],
            100,
            0,
            true,
        ),
    ]
}

/// Document ID: `<epochSeconds>_<dayOfWeek>_<taskName underscored>`.
fn document_id(completed_at: &DateTime<Utc>, task: &SeedTask) -> String {
    format!(
        "{}_{}_{}",
        completed_at.timestamp(),
        task.day_of_week,
        task.task_name.replace(' ', "_")
    )
}

/// Build the fields written for one completion.
fn completion_fields(task: &SeedTask, completed_at: &DateTime<Utc>, identity: &Identity) -> Value {
    let total_time: f64 = task.step_times.iter().sum();
    let estimated_total: f64 = task.estimated_times.iter().sum();

    let mut fields = json!({
        "taskName": task.task_name,
        "taskIcon": task.task_icon,
        "dayOfWeek": task.day_of_week,
        "stepTimes": task.step_times,
        "estimatedTimes": task.estimated_times,
        "totalTime": total_time,
        "estimatedTotal": estimated_total,
        "totalScore": task.total_score,
        "completedAt": completed_at.to_rfc3339(),
        "timestamp": timestamp_value(completed_at),
        "userId": identity.uid.as_str(),
        "userEmail": identity.email.as_str(),
    });
    if task.is_bonus {
        fields["isBonus"] = json!(true);
    }
    fields
}

/// Sign in and write the sample records.
///
/// # Errors
///
/// Returns an error (exit 1) if the password argument is missing, the email
/// is malformed, or sign-in fails. Individual record-write failures are
/// counted and logged but do not fail the command.
pub async fn run(email: &str, password: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let Some(password) = password else {
        error!("Password required");
        info!("Usage: sa-cli seed <email> <password>");
        return Err("password argument missing".into());
    };

    let email = Email::parse(email)?;
    let config = GatewayConfig::from_env()?;
    let auth = FirebaseAuthClient::new(&config);

    info!(email = %email, "Signing in");
    let identity = auth.sign_in(&email, password).await?;
    info!(uid = %identity.uid, "Signed in successfully");

    let store = FirestoreClient::new(&config).with_id_token(identity.id_token.clone());
    let collection = format!("users/{}/taskHistory", identity.uid);

    let now = Utc::now();
    let mut created = 0_u32;
    let mut failed = 0_u32;

    for task in sample_completions() {
        let completed_at = now - Duration::days(task.days_ago);
        let doc_id = document_id(&completed_at, &task);
        let fields = completion_fields(&task, &completed_at, &identity);

        match store
            .upsert(&collection, &doc_id, &fields, MergeMode::Replace)
            .await
        {
            Ok(()) => {
                info!(
                    task = task.task_name,
                    score = task.total_score,
                    doc_id = %doc_id,
                    bonus = task.is_bonus,
                    "Created task completion"
                );
                created += 1;
            }
            Err(err) => {
                error!(task = task.task_name, error = %err, "Failed to create record");
                failed += 1;
            }
        }
    }

    info!("Created {created} task completion records");
    if failed > 0 {
        error!("Failed to create {failed} records");
    }

    Ok(())
}
