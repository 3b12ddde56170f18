use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use uuid::Uuid;

use f1_trivia::engine::{DEFAULT_QUESTION_SECONDS, EngineMode, QuizEngine};
use f1_trivia::manager::SortOrder;
use f1_trivia::models::{Difficulty, QuestionDraft, QuestionType, SettingsOverrides};
use f1_trivia::source::{self, Category, OpenTdbClient};
use f1_trivia::stats::{self, StatsSummary};
use f1_trivia::storage::Store;
use f1_trivia::{Auth, Config, QuestionManager, Quiz, QuizError, QuizSession, export, logging};

#[derive(Parser, Debug)]
#[command(version, about = "Formula 1 trivia in the terminal", long_about = None)]
struct Cli {
    /// Directory holding accounts, questions, history and the log file
    #[arg(long, global = true, env = "F1_TRIVIA_DATA_DIR", default_value = f1_trivia::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Seconds per question in timed mode
    #[arg(long, global = true, default_value_t = DEFAULT_QUESTION_SECONDS)]
    question_seconds: u32,

    /// Log level written to the log file
    #[arg(long, global = true, env = "F1_TRIVIA_LOG", default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Register { username: String, password: String },
    /// Sign in and remember the session
    Login { username: String, password: String },
    /// Forget the current session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Save remote quiz settings and the resulting API URL
    Setup(SettingsArgs),
    /// List the remote trivia categories
    Categories,
    /// Play a quiz
    Play(PlayArgs),
    /// Manage the local question bank
    #[command(subcommand)]
    Questions(QuestionsCommand),
    /// Show game history and averages
    Stats,
    /// Write the whole question bank to a JSON file
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// Query string such as "amount=5&difficulty=easy"; flags win over it
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long = "type")]
    kind: Option<QuestionType>,
}

impl SettingsArgs {
    fn overrides(&self) -> SettingsOverrides {
        let from_query = self
            .query
            .as_deref()
            .map(SettingsOverrides::from_query)
            .unwrap_or_default();
        from_query.merged_with(SettingsOverrides {
            amount: self.amount.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty,
            kind: self.kind,
        })
    }
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Fetch questions from OpenTDB instead of the local bank
    #[arg(long, conflicts_with = "file")]
    remote: bool,

    /// Load questions from a JSON file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Count down every question (default for remote play)
    #[arg(long, conflicts_with = "free")]
    timed: bool,

    /// No countdown; move between questions freely (default for local play)
    #[arg(long)]
    free: bool,

    /// Where quiz exports are written
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Subcommand, Debug)]
enum QuestionsCommand {
    /// Add a question
    Add(DraftArgs),
    /// List questions
    List {
        /// Case-insensitive text filter
        #[arg(long, default_value = "")]
        filter: String,
        /// "recency" (newest first) or "text"
        #[arg(long, default_value = "recency")]
        sort: SortOrder,
    },
    /// Replace a question's text, options and answer in place
    Edit {
        id: Uuid,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete one question
    Delete { id: Uuid },
    /// Delete every question
    Clear {
        /// Confirm deleting the whole bank
        #[arg(long)]
        yes: bool,
    },
    /// Store the default questions if the bank is empty
    Seed,
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(long)]
    text: String,
    /// Answer option; repeat 2 to 4 times
    #[arg(long = "option", required = true)]
    options: Vec<String>,
    /// 1-based number of the correct option
    #[arg(long)]
    correct: usize,
}

impl DraftArgs {
    fn into_draft(self) -> QuestionDraft {
        QuestionDraft::new(self.text, self.options, self.correct)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), QuizError> {
    let config = Config {
        data_dir: cli.data_dir,
        question_seconds: cli.question_seconds,
        log_level: cli.log_level,
    };
    let store = config.open_store()?;
    logging::init(&config)?;

    match cli.command {
        Command::Register { username, password } => {
            Auth::new(store).register(&username, &password)?;
            println!("Registered {}. You can now log in.", username.trim());
        }
        Command::Login { username, password } => {
            let session = Auth::new(store).sign_in(&username, &password)?;
            println!("Signed in as {}.", session.username);
        }
        Command::Logout => {
            Auth::new(store).sign_out()?;
            println!("Signed out.");
        }
        Command::Whoami => match Auth::new(store).current()? {
            Some(session) => println!("{}", session.username),
            None => println!("Not signed in."),
        },
        Command::Setup(args) => setup(store.as_ref(), &args)?,
        Command::Categories => categories().await,
        Command::Play(args) => play(&config, store, args).await?,
        Command::Questions(command) => questions(QuestionManager::new(store), command)?,
        Command::Stats => print_stats(store)?,
        Command::Export { dir } => {
            let questions = QuestionManager::new(store).all()?;
            let path = export::export_all_questions(&questions, &dir)?;
            println!("Exported {} questions to {}", questions.len(), path.display());
        }
    }

    Ok(())
}

fn setup(store: &dyn Store, args: &SettingsArgs) -> Result<(), QuizError> {
    let (_, url) = source::save_setup(store, &args.overrides())?;
    println!("Settings saved. Questions will be fetched from:\n  {url}");
    Ok(())
}

async fn categories() {
    let categories = match OpenTdbClient::new().fetch_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            log::warn!("failed to load categories: {e}");
            eprintln!("Warning: could not load categories ({e}).");
            Vec::new()
        }
    };

    println!("{:>4}  Any Category", "");
    for Category { id, name } in categories {
        println!("{id:>4}  {name}");
    }
}

async fn play(config: &Config, store: Arc<dyn Store>, args: PlayArgs) -> Result<(), QuizError> {
    let questions = if args.remote {
        let url = source::quiz_url(store.as_ref(), &args.settings.overrides())?;
        OpenTdbClient::new().fetch_questions(url).await?
    } else if let Some(path) = &args.file {
        source::load_questions_from_json(path)?
    } else {
        QuestionManager::new(Arc::clone(&store)).quiz_questions()?
    };

    let timed = if args.timed || args.free {
        args.timed
    } else {
        args.remote
    };
    let mode = if timed {
        EngineMode::Timed {
            seconds: config.question_seconds,
        }
    } else {
        EngineMode::Free
    };

    let user = Auth::new(Arc::clone(&store)).current()?;
    let engine = QuizEngine::new(questions, mode)?;
    let session = QuizSession::start(store, user, engine);
    Quiz::new(session, args.export_dir).run()
}

fn questions(manager: QuestionManager, command: QuestionsCommand) -> Result<(), QuizError> {
    match command {
        QuestionsCommand::Add(args) => {
            let question = manager.create(args.into_draft())?;
            println!("Added {}", question.id);
        }
        QuestionsCommand::List { filter, sort } => {
            let questions = manager.list(&filter, sort)?;
            if questions.is_empty() {
                println!("No questions yet.");
            }
            for question in questions {
                println!("{}  {}", question.id, question.text);
                for (index, option) in question.options.iter().enumerate() {
                    let marker = if question.is_correct(index + 1) { "*" } else { " " };
                    println!("    {marker} {}. {option}", index + 1);
                }
            }
        }
        QuestionsCommand::Edit { id, draft } => {
            let question = manager.update(id, draft.into_draft())?;
            println!("Updated {}", question.id);
        }
        QuestionsCommand::Delete { id } => {
            let question = manager.delete(id)?;
            println!("Deleted \"{}\"", question.text);
        }
        QuestionsCommand::Clear { yes } => {
            if !yes {
                println!("This deletes every question. Re-run with --yes to confirm.");
                return Ok(());
            }
            manager.clear()?;
            println!("All questions cleared.");
        }
        QuestionsCommand::Seed => {
            if manager.seed_defaults()? {
                println!("Stored the default questions.");
            } else {
                println!("The question bank is not empty; nothing to do.");
            }
        }
    }
    Ok(())
}

fn print_stats(store: Arc<dyn Store>) -> Result<(), QuizError> {
    let summary = StatsSummary::load(store.as_ref())?;

    if summary.total_games == 0 {
        println!("No games played yet.");
    } else {
        println!("{:<12} {:>6} {:>8}", "Date", "Score", "Time");
        for game in &summary.games {
            println!("{:<12} {:>6} {:>7}s", game.date, game.score, game.time_taken);
        }
        println!();
    }
    println!("Total games:   {}", summary.total_games);
    println!("Average score: {}", summary.average_label());
    println!("Fastest time:  {}", summary.fastest_label());

    if let Some(session) = Auth::new(Arc::clone(&store)).current()? {
        let attempts = stats::user_attempts(store.as_ref(), &session.username)?;
        println!(
            "{}: {} attempts, last score {}",
            session.username,
            attempts.len(),
            stats::last_score(&attempts)
        );
    }
    Ok(())
}
