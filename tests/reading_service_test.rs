use anyhow::Result;
use httpmock::prelude::*;
use sol_tarot::config::toml_config::OpenAiConfig;
use sol_tarot::core::reading::FALLBACK_INTERPRETATION;
use sol_tarot::domain::model::{DrawnCardPayload, Interpretation, ReadingRequest};
use sol_tarot::{
    JsonFileStore, LocalStorage, OpenAiInterpreter, ReadingService, TarotError, TomlConfig,
};
use serde_json::json;
use tempfile::TempDir;

const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
const MINT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

type Service = ReadingService<OpenAiInterpreter, JsonFileStore<LocalStorage>>;

fn service(server: &MockServer, data_dir: &TempDir) -> Result<Service> {
    let config = OpenAiConfig {
        base_url: server.url("/v1"),
        timeout_seconds: 5,
        ..OpenAiConfig::default()
    };
    let interpreter = OpenAiInterpreter::with_api_key(&config, "sk-test")?;
    let store = JsonFileStore::new(LocalStorage::new(data_dir.path()));
    Ok(ReadingService::new(interpreter, store))
}

fn request(spread: &str, names: [&str; 3]) -> ReadingRequest {
    ReadingRequest {
        wallet_address: WALLET.to_string(),
        spread_type: spread.to_string(),
        drawn_cards: names
            .iter()
            .enumerate()
            .map(|(i, name)| DrawnCardPayload {
                card_name: name.to_string(),
                position: (i + 1) as u8,
                is_reversed: i == 1,
            })
            .collect(),
    }
}

fn interpretation_reply() -> serde_json::Value {
    let content = json!({
        "fullMessage": "A steady path opens.",
        "cards": [
            {"position": "Past", "cardName": "the-hierophant", "direction": "upright", "interpretation": "tradition"}
        ],
        "conclusion": "Keep going."
    });
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": format!("```json\n{}\n```", content)}}
        ]
    })
}

#[tokio::test]
async fn test_create_reading_stores_interpretation() -> Result<()> {
    let server = MockServer::start();
    let data_dir = TempDir::new()?;
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .body_contains("the-hierophant")
            .body_contains("5-of-cups (reversed)");
        then.status(200).json_body(interpretation_reply());
    });

    let service = service(&server, &data_dir)?;
    let reading = service
        .create_reading(request("loveFortune", ["the-hierophant", "5-of-cups", "7-of-pentacles"]))
        .await?;

    api_mock.assert();
    assert_eq!(reading.id, 1);
    assert!(!reading.is_minted);
    let parsed = Interpretation::parse(&reading.ai_interpretation).expect("structured reply");
    assert_eq!(parsed.full_message, "A steady path opens.");
    assert_eq!(parsed.cards.len(), 1);

    assert!(data_dir.path().join("readings.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_interpreter_failure_stores_fallback() -> Result<()> {
    let server = MockServer::start();
    let data_dir = TempDir::new()?;
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let service = service(&server, &data_dir)?;
    let reading = service
        .create_reading(request("wealthFlow", ["the-fool", "the-magician", "3-of-cups"]))
        .await?;

    assert_eq!(reading.ai_interpretation, FALLBACK_INTERPRETATION);
    assert_eq!(service.reading_by_id(reading.id).await?, reading);
    Ok(())
}

#[tokio::test]
async fn test_invalid_request_never_reaches_interpreter() -> Result<()> {
    let server = MockServer::start();
    let data_dir = TempDir::new()?;
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(interpretation_reply());
    });

    let service = service(&server, &data_dir)?;

    let err = service
        .create_reading(request("tarotOfTheDay", ["the-fool", "the-magician", "3-of-cups"]))
        .await
        .unwrap_err();
    assert!(matches!(err, TarotError::UnknownSpread { .. }));

    let err = service
        .create_reading(request("loveFortune", ["the-fool", "the-fool", "3-of-cups"]))
        .await
        .unwrap_err();
    assert!(matches!(err, TarotError::InvalidRequest { .. }));

    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_history_show_and_mint() -> Result<()> {
    let server = MockServer::start();
    let data_dir = TempDir::new()?;
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(interpretation_reply());
    });

    let service = service(&server, &data_dir)?;
    let first = service
        .create_reading(request("energyState", ["the-sun", "the-moon", "the-star"]))
        .await?;
    let second = service
        .create_reading(request("careerGrowth", ["1-of-wands", "2-of-wands", "3-of-wands"]))
        .await?;

    let history = service.readings_by_wallet(WALLET).await?;
    assert_eq!(
        history.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![second.id, first.id]
    );

    assert!(matches!(
        service.reading_by_id(99).await,
        Err(TarotError::ReadingNotFound { id: 99 })
    ));

    let metadata = service.nft_metadata(first.id, "bafyimagecid").await?;
    assert_eq!(metadata.name, "Tarot Reading #001");
    assert!(metadata.image.ends_with("/bafyimagecid"));
    assert_eq!(metadata.attributes.len(), 4);

    let minted = service.record_mint(first.id, MINT, "bafyimagecid").await?;
    assert!(minted.is_minted);
    assert_eq!(minted.mint_address.as_deref(), Some(MINT));
    assert!(service.record_mint(first.id, MINT, "bafyimagecid").await.is_err());

    let reloaded = service.reading_by_id(first.id).await?;
    assert!(reloaded.is_minted);
    assert_eq!(reloaded.image_cid.as_deref(), Some("bafyimagecid"));
    Ok(())
}

#[test]
fn test_missing_api_key_is_reported() {
    std::env::remove_var("OPENAI_API_KEY");
    let config = TomlConfig::default();

    let err = OpenAiInterpreter::new(&config.openai).unwrap_err();
    assert!(matches!(err, TarotError::MissingConfigError { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_mints_only_one_wins() -> Result<()> {
    const OTHER_MINT: &str = "7eDZ3HhU6Gg1hDdVrnS3V98oHN4fWCfGEnum7FxXjoVK";

    let server = MockServer::start();
    let data_dir = TempDir::new()?;
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(interpretation_reply());
    });

    let service = service(&server, &data_dir)?;
    let reading = service
        .create_reading(request("lifeTurningPoint", ["the-tower", "the-star", "the-world"]))
        .await?;

    let (first, second) = tokio::join!(
        service.record_mint(reading.id, MINT, "cidA"),
        service.record_mint(reading.id, OTHER_MINT, "cidB"),
    );
    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );

    let winner = first.or(second)?;
    let stored = service.reading_by_id(reading.id).await?;
    assert_eq!(stored.mint_address, winner.mint_address);
    assert_eq!(stored.image_cid, winner.image_cid);
    Ok(())
}
