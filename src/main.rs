use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{seq::index, SeedableRng};
use sol_tarot::core::cards::{self, CardIndex, DECK_SIZE};
use sol_tarot::core::session::DrawSession;
use sol_tarot::core::shuffle;
use sol_tarot::domain::model::{Interpretation, Reading};
use sol_tarot::domain::ports::ReadingStore;
use sol_tarot::domain::spreads::{Category, SpreadKind, CARDS_PER_SPREAD};
use sol_tarot::utils::error::{ErrorSeverity, TarotError};
use sol_tarot::utils::{logger, validation::Validate};
use sol_tarot::{
    CliConfig, JsonFileStore, LocalStorage, OpenAiInterpreter, ReadingService, TomlConfig,
};
use std::time::Duration;

// Keeps card orientation independent of the shuffle when both come from one seed.
const ORIENTATION_SALT: u64 = 0x5EED_0F_7A20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => TomlConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.path = dir.clone();
    }

    let verbose = cli.verbose || config.logging.verbose;
    if config.logging.json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    for result in [cli.validate(), config.validate()] {
        if let Err(e) = result {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: CliConfig, config: TomlConfig) -> sol_tarot::Result<()> {
    use sol_tarot::config::Command;

    match cli.command {
        Command::Spreads { category } => list_spreads(category.as_deref()),
        Command::Card { card } => describe_card(&card),
        Command::Draw {
            spread,
            wallet,
            picks,
            seed,
            offline,
        } => draw(&config, &spread, &wallet, picks, seed, offline).await,
        Command::History { wallet } => {
            let readings = store(&config).readings_by_wallet(&wallet).await?;
            if readings.is_empty() {
                println!("No readings for {}", wallet);
            }
            for reading in &readings {
                print_summary(reading);
            }
            Ok(())
        }
        Command::Show { id } => {
            let reading = store(&config)
                .reading_by_id(id)
                .await?
                .ok_or(TarotError::ReadingNotFound { id })?;
            print_reading(&reading);
            Ok(())
        }
    }
}

fn store(config: &TomlConfig) -> JsonFileStore<LocalStorage> {
    JsonFileStore::new(LocalStorage::new(&config.storage.path))
}

fn list_spreads(category: Option<&str>) -> sol_tarot::Result<()> {
    let categories = match category {
        Some(key) => vec![key.parse::<Category>()?],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        println!("{} ({})", category.name(), category.key());
        for spread in SpreadKind::by_category(category) {
            println!("  {:<28} {}", spread.key(), spread.name());
            for (position, question) in spread.position_names().iter().zip(spread.questions()) {
                println!("      {}: {}", position, question);
            }
        }
    }
    Ok(())
}

fn describe_card(card: &str) -> sol_tarot::Result<()> {
    let index = match card.parse::<usize>() {
        Ok(i) => CardIndex::new(i)?,
        Err(_) => cards::name_to_index(card)?,
    };
    println!("{:>2}  {}  {}", index, index.name(), index.image_path());
    Ok(())
}

async fn draw(
    config: &TomlConfig,
    spread_key: &str,
    wallet: &str,
    picks: Vec<usize>,
    seed: Option<u64>,
    offline: bool,
) -> sol_tarot::Result<()> {
    let spread: SpreadKind = spread_key.parse()?;

    let (shuffled, mut rng) = match seed {
        Some(seed) => {
            let mut shuffle_rng = StdRng::seed_from_u64(seed);
            (
                shuffle::shuffled_deck(&mut shuffle_rng),
                StdRng::seed_from_u64(seed ^ ORIENTATION_SALT),
            )
        }
        None => (shuffle::shuffled_deck_from_entropy(), StdRng::from_entropy()),
    };

    let picks = if picks.is_empty() {
        index::sample(&mut rng, DECK_SIZE, CARDS_PER_SPREAD).into_vec()
    } else {
        picks
    };
    tracing::debug!(?picks, "Fan positions chosen");

    println!("{}: {}", spread.name(), spread.description());
    let delay = Duration::from_millis(config.session.confirm_delay_ms);
    let mut session = DrawSession::new().start(spread, shuffled);

    for fan_position in picks {
        if let Some(question) = session.question_text() {
            println!("\n{}", question);
        }
        let card = session
            .card_at(fan_position)
            .ok_or(TarotError::InvalidIndex {
                index: fan_position,
            })?;
        session = session.pick(card);
        tokio::time::sleep(delay).await;
        session = session.confirm(&mut rng);

        if let Some(drawn) = session.drawn_cards().last() {
            println!(
                "  {} -> {}{}  [{}]",
                spread.position_name(drawn.position),
                drawn.canonical_name,
                if drawn.is_reversed { " (reversed)" } else { "" },
                drawn.card_index.image_path()
            );
        }
    }

    let request = session.to_request(wallet)?;
    if offline {
        println!("\n{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let interpreter = OpenAiInterpreter::new(&config.openai)?;
    let service = ReadingService::new(interpreter, store(config));

    let reading = service.create_reading(request).await?;
    println!();
    print_reading(&reading);
    Ok(())
}

fn print_summary(reading: &Reading) {
    let spread = reading
        .spread_type
        .parse::<SpreadKind>()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|_| reading.spread_type.clone());
    let cards: Vec<String> = reading
        .drawn_cards
        .iter()
        .map(|c| {
            if c.is_reversed {
                format!("{} (reversed)", c.card_name)
            } else {
                c.card_name.clone()
            }
        })
        .collect();
    println!(
        "#{:<4} {}  {:<28} {}{}",
        reading.id,
        reading.created_at.format("%Y-%m-%d %H:%M"),
        spread,
        cards.join(", "),
        if reading.is_minted { "  [minted]" } else { "" }
    );
}

fn print_reading(reading: &Reading) {
    print_summary(reading);
    println!();

    match Interpretation::parse(&reading.ai_interpretation) {
        Some(interpretation) => {
            println!("{}", interpretation.full_message);
            for card in &interpretation.cards {
                println!(
                    "\n{} - {} ({})\n{}",
                    card.position, card.card_name, card.direction, card.interpretation
                );
            }
            if !interpretation.conclusion.is_empty() {
                println!("\n{}", interpretation.conclusion);
            }
        }
        None => println!("{}", reading.ai_interpretation),
    }

    if let Some(mint) = &reading.mint_address {
        println!("\nMint: {}", mint);
    }
}
