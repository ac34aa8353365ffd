use std::path::PathBuf;

use eyre::{eyre, Result};
use mindcare_client::api::ApiClient;
use mindcare_client::config::ClientConfig;
use mindcare_client::error::ClientError;
use mindcare_client::flow;
use mindcare_client::session::Session;
use mindcare_client::store::SessionStore;
use mindcare_core::models::assessment::{AssessmentOutcome, ResultSource};
use mindcare_core::models::contact::ContactRequest;
use mindcare_core::models::recommendation::Recommendation;
use mindcare_core::models::subscale::{Subscale, SubscaleResults};
use mindcare_core::models::user::UserInfo;
use mindcare_instruments::instruments::dass21::{compute_scores, Dass21, ANSWER_LABELS, ITEM_COUNT};
use mindcare_instruments::recommend;
use mindcare_instruments::scoring::Item;
use mindcare_instruments::Instrument;
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Commands};

/// Everything a session command needs.
struct Context {
    store: SessionStore,
    api: ApiClient,
    json: bool,
}

impl Context {
    fn new(api_url: Option<String>, session_file: Option<PathBuf>, json: bool) -> Result<Self> {
        let store = match session_file {
            Some(path) => SessionStore::new(path),
            None => SessionStore::default_location()?,
        };
        let env_config = ClientConfig::from_env();
        let config = match api_url {
            Some(url) => ClientConfig::new(url).with_timeout(env_config.timeout),
            None => env_config,
        };
        Ok(Self {
            store,
            api: ApiClient::new(config),
            json,
        })
    }

    fn load(&self) -> Result<Session> {
        Ok(self.store.load_or_new()?)
    }

    fn save(&self, session: &Session) -> Result<()> {
        Ok(self.store.save(session)?)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        api_url,
        session_file,
        json,
        ..
    } = cli;
    let context = || Context::new(api_url.clone(), session_file.clone(), json);

    match command {
        Commands::Questions => questions(json),
        Commands::Score { answers } => score(json, &answers),
        Commands::Start {
            first_name,
            last_name,
            email,
            phone,
            age,
            gender,
            department,
            report_to,
        } => start(
            &context()?,
            UserInfo {
                first_name,
                last_name,
                email,
                phone,
                age,
                gender,
                department,
                report_to,
            },
        ),
        Commands::Answer { question, value } => answer(&context()?, question, value),
        Commands::Assess { answers } => assess(&context()?, answers),
        Commands::Chat { message } => chat(&context()?, &message.join(" ")),
        Commands::End => end(&context()?),
        Commands::Export { output } => export(&context()?, output),
        Commands::Status => status(&context()?),
        Commands::Recommendations { subscale } => recommendations(&context()?, subscale),
        Commands::Resources => {
            let resources = recommend::emergency_resources();
            if json {
                return print_json(&resources);
            }
            print_recommendations(&resources);
            Ok(())
        }
        Commands::Contact {
            name,
            email,
            message,
        } => contact(
            &context()?,
            ContactRequest {
                name,
                email,
                message,
            },
        ),
        Commands::Reset => {
            context()?.store.clear()?;
            if !json {
                println!("Session cleared.");
            }
            Ok(())
        }
    }
}

fn recommendations(ctx: &Context, subscale: Option<Subscale>) -> Result<()> {
    let recommendations = match subscale {
        Some(subscale) => flow::subscale_recommendations(&ctx.api, subscale),
        None => {
            let session = ctx.load()?;
            if session.results().is_none() {
                return Err(ClientError::NoAssessment.into());
            }
            session.recommendations()
        }
    };
    if ctx.json {
        return print_json(&recommendations);
    }
    print_recommendations(&recommendations);
    Ok(())
}

fn contact(ctx: &Context, request: ContactRequest) -> Result<()> {
    let ack = flow::submit_contact(&ctx.api, &request)?;
    if ctx.json {
        return print_json(&ack);
    }
    if ack.message.is_empty() {
        println!("Message sent.");
    } else {
        println!("{}", ack.message);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionSheet<'a> {
    instrument: &'a str,
    answer_labels: &'a [&'a str],
    items: &'a [Item],
}

fn questions(json: bool) -> Result<()> {
    let items = Dass21.items();
    if json {
        return print_json(&QuestionSheet {
            instrument: Dass21.name(),
            answer_labels: &ANSWER_LABELS,
            items,
        });
    }

    println!("Over the past week, how much did each statement apply to you?\n");
    for (value, label) in ANSWER_LABELS.iter().enumerate() {
        println!("  {value}  {label}");
    }
    println!();
    for item in items {
        println!("{:>2}. {}", item.index + 1, item.text);
    }
    Ok(())
}

fn score(json: bool, answers: &[i32]) -> Result<()> {
    Dass21.check_answers(answers)?;
    let results = compute_scores(answers);
    if json {
        return print_json(&results);
    }
    print_results(&results);
    println!();
    print_recommendations(&recommend::recommendations(&results));
    Ok(())
}

fn start(ctx: &Context, user: UserInfo) -> Result<()> {
    let mut session = ctx.load()?;
    session.reset();
    session.start(user)?;
    ctx.save(&session)?;
    info!(session_id = %session.id, "session started");

    if ctx.json {
        return print_json(&session);
    }
    let name = session.user.as_ref().map(UserInfo::full_name).unwrap_or_default();
    println!("Session started for {name}.");
    println!("Answer each question with `mindcare answer <question> <value>`, then run `mindcare assess`.");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerReport {
    question: usize,
    value: i32,
    answered: usize,
}

fn answer(ctx: &Context, question: usize, value: i32) -> Result<()> {
    let index = question
        .checked_sub(1)
        .ok_or_else(|| eyre!("question numbers start at 1"))?;

    let mut session = ctx.load()?;
    session.record_answer(index, value)?;
    ctx.save(&session)?;

    let answered = session.answered_count();
    if ctx.json {
        return print_json(&AnswerReport {
            question,
            value,
            answered,
        });
    }
    let label = usize::try_from(value)
        .ok()
        .and_then(|v| ANSWER_LABELS.get(v))
        .copied()
        .unwrap_or_default();
    println!("Question {question}: {label}. {answered}/{ITEM_COUNT} answered.");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssessReport {
    #[serde(flatten)]
    outcome: AssessmentOutcome,
    opening_message: String,
    recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    emergency_resources: Vec<Recommendation>,
}

fn assess(ctx: &Context, answers: Option<Vec<i32>>) -> Result<()> {
    let mut session = ctx.load()?;
    if let Some(answers) = answers {
        session.set_answers(&answers)?;
    }

    let outcome = flow::submit_assessment(&ctx.api, &mut session)?;
    ctx.save(&session)?;

    let first_name = session
        .user
        .as_ref()
        .map(|u| u.first_name.as_str())
        .unwrap_or_default();
    let report = AssessReport {
        opening_message: recommend::opening_message(first_name, &outcome.results),
        recommendations: session.recommendations(),
        emergency_resources: if outcome.severe_case_detected {
            recommend::emergency_resources()
        } else {
            Vec::new()
        },
        outcome,
    };

    if ctx.json {
        return print_json(&report);
    }

    print_results(&report.outcome.results);
    if report.outcome.source == ResultSource::Local {
        println!("(scored on this device; the counseling service was unavailable)");
    }
    if !report.emergency_resources.is_empty() {
        println!("\nYour results suggest you may need immediate support:");
        print_recommendations(&report.emergency_resources);
    }
    println!("\n{}", report.opening_message);
    Ok(())
}

fn chat(ctx: &Context, message: &str) -> Result<()> {
    let mut session = ctx.load()?;
    let result = flow::send_chat(&ctx.api, &mut session, message);
    // The user's message is kept even when the reply fails.
    ctx.save(&session)?;
    let response = result?;

    if ctx.json {
        return print_json(&response);
    }
    println!("{}", response.response);
    if let Some(recommendations) = response.recommendations.as_deref().filter(|r| !r.is_empty()) {
        println!();
        print_recommendations(recommendations);
    }
    if response.should_end_session {
        println!("\nThe counselor suggests wrapping up. Run `mindcare end` when you are ready.");
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndReport {
    delivered: bool,
    duration: String,
    recommendations: Vec<Recommendation>,
}

fn end(ctx: &Context) -> Result<()> {
    let mut session = ctx.load()?;
    let outcome = flow::end_session(&ctx.api, &mut session)?;
    ctx.save(&session)?;

    let report = EndReport {
        delivered: outcome.delivered,
        duration: session.duration(jiff::Timestamp::now()),
        recommendations: outcome.recommendations,
    };
    if ctx.json {
        return print_json(&report);
    }

    println!("Session ended after {}.", report.duration);
    if report.delivered {
        println!("Your session report has been sent.");
    } else {
        println!("The session report could not be sent; use `mindcare export` to keep a copy.");
    }
    println!("\nRecommendations:");
    print_recommendations(&report.recommendations);
    Ok(())
}

fn export(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let session = ctx.load()?;
    let summary = serde_json::to_string_pretty(&session.export(jiff::Timestamp::now()))?;

    match output {
        Some(path) => {
            std::fs::write(&path, summary)?;
            info!(path = %path.display(), "session exported");
            if !ctx.json {
                println!("Session exported to {}.", path.display());
            }
        }
        None => println!("{summary}"),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    session_id: String,
    user: Option<String>,
    answered: usize,
    results: Option<SubscaleResults>,
    messages: u32,
    duration: String,
    ended: bool,
}

fn status(ctx: &Context) -> Result<()> {
    let session = ctx.load()?;
    let report = StatusReport {
        session_id: session.id.to_string(),
        user: session.user.as_ref().map(UserInfo::full_name),
        answered: session.answered_count(),
        results: session.results().copied(),
        messages: session.message_count,
        duration: session.duration(jiff::Timestamp::now()),
        ended: session.is_ended(),
    };
    if ctx.json {
        return print_json(&report);
    }

    println!("Session {}", report.session_id);
    println!("User:     {}", report.user.as_deref().unwrap_or("(not started)"));
    println!("Answered: {}/{ITEM_COUNT}", report.answered);
    println!("Messages: {}", report.messages);
    println!("Duration: {}", report.duration);
    if report.ended {
        println!("Ended:    yes");
    }
    if let Some(results) = &report.results {
        println!();
        print_results(results);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_results(results: &SubscaleResults) {
    for (subscale, result) in results.iter() {
        println!("{:<11} {:>2}  {}", subscale.label(), result.score, result.level);
    }
}

fn print_recommendations(recommendations: &[Recommendation]) {
    for r in recommendations {
        println!("- {}: {}", r.title, r.description);
    }
}
