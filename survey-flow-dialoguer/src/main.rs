//! Answer a survey in the terminal and print the submission body.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use survey_flow::{
    JsonFileSource, NormalizeOptions, RequestContext, RespondentInfo, SurveyLoader, decode_survey_slug, lint, run,
};
use survey_flow_dialoguer::{DialoguerRespondent, is_cancellation};

#[derive(Parser)]
#[command(name = "survey-runner")]
#[command(about = "Answer a patient survey step by step and print the submission body")]
#[command(version)]
struct Cli {
    /// Survey payload file, or a directory holding `<survey id>.json` files
    source: PathBuf,

    /// Survey id to load from a directory source
    #[arg(long, conflicts_with = "slug")]
    survey: Option<String>,

    /// Public survey link slug; the survey id is decoded from its last segment
    #[arg(long)]
    slug: Option<String>,

    /// Base URL recorded in the request context
    #[arg(long, default_value = "")]
    base_url: String,

    /// Bearer token recorded in the request context
    #[arg(long, env = "SURVEY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Deepest nesting of follow-up questions to read from the payload
    #[arg(long, default_value_t = NormalizeOptions::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Report authoring problems in the survey and exit
    #[arg(long)]
    lint: bool,

    /// Disable colored prompts
    #[arg(long)]
    plain: bool,

    /// Respondent's full name
    #[arg(long, default_value = "")]
    full_name: String,

    /// Respondent's position
    #[arg(long, default_value = "")]
    position: String,

    /// Respondent's phone number
    #[arg(long, default_value = "")]
    phone_number: String,

    /// Respondent's organization
    #[arg(long, default_value = "")]
    company_name: String,

    /// Write the submission body here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let survey_id = match (&cli.survey, &cli.slug) {
        (_, Some(slug)) => decode_survey_slug(slug).with_context(|| format!("invalid survey link: {slug}"))?,
        (Some(id), None) => id.clone(),
        (None, None) => String::new(),
    };

    let mut context = RequestContext::new(cli.base_url.clone());
    if let Some(token) = &cli.token {
        context = context.with_bearer(token.clone());
    }
    let mut loader =
        SurveyLoader::new(context).with_options(NormalizeOptions::default().with_max_depth(cli.max_depth));
    let source = JsonFileSource::new(&cli.source);
    let tree = loader
        .load(&source, &survey_id)
        .with_context(|| format!("loading survey from {}", cli.source.display()))?;

    if cli.lint {
        let warnings = lint(tree);
        for warning in &warnings {
            println!("{warning}");
        }
        println!("{} warning(s)", warnings.len());
        return Ok(());
    }

    if tree.is_empty() {
        println!("No questions available.");
        return Ok(());
    }
    if let Some(title) = &tree.meta().title {
        println!("{title}");
        if let Some(description) = &tree.meta().description {
            println!("{description}");
        }
        println!();
    }

    let respondent = if cli.plain {
        DialoguerRespondent::plain()
    } else {
        DialoguerRespondent::new()
    };
    let session = match run(tree, respondent) {
        Ok(session) => session,
        Err(err) if is_cancellation(&err) => {
            println!("Survey cancelled.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let body = session.submission(RespondentInfo {
        full_name: cli.full_name,
        position: cli.position,
        phone_number: cli.phone_number,
        company_name: cli.company_name,
    })?;
    let json = serde_json::to_string_pretty(&body)?;
    match &cli.output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
