//! Loading and writing config files on disk.
use termfolio::config::{Config, SubjectSource};
use termfolio::games::{GameRegistry, ScoringPolicy, Theme};

#[test]
fn create_default_then_load_round_trips() {
    tokio_test::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        Config::create_default(path).await.unwrap();
        let cfg = Config::load(path).await.unwrap();
        assert_eq!(cfg.shell.prompt, "> ");
        assert_eq!(cfg.snake.countdown_ticks, 5);
        assert_eq!(cfg.games.countries.source, SubjectSource::Catalog);
        assert_eq!(
            cfg.games.house_characters.scoring(Theme::HouseCharacters),
            ScoringPolicy::new(12, 16)
        );
    });
}

#[test]
fn missing_file_is_an_error_with_the_path() {
    tokio_test::block_on(async {
        let err = Config::load("/definitely/not/here.toml").await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    });
}

#[test]
fn invalid_values_are_rejected_on_load() {
    tokio_test::block_on(async {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[snake]\ngrid_size = 1\n").unwrap();
        let err = Config::load(path.to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("grid_size"), "{}", err);
    });
}

#[tokio::test]
async fn custom_catalog_path_feeds_the_registry() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("countries.json");
    std::fs::write(
        &catalog,
        r#"[{"identifier":"Peru","display_name":"Peru","hints":["Region: Americas"],
            "payload":{"kind":"country","capital":"Lima","region":"Americas","population":34000000}}]"#,
    )
    .unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[games.countries]\ncatalog_path = \"{}\"\n\n[games.house_characters]\nenabled = false\n",
            catalog.display()
        ),
    )
    .unwrap();

    let cfg = Config::load(config_path.to_str().unwrap()).await.unwrap();
    let mut games = GameRegistry::from_config(&cfg).unwrap();
    assert!(!games.is_registered(Theme::HouseCharacters));

    games
        .dispatch(Theme::Countries, termfolio::games::GameCommand::Start)
        .await
        .unwrap();
    let subject = games.session(Theme::Countries).and_then(|s| s.subject()).unwrap();
    assert_eq!(subject.identifier, "Peru");
}

#[test]
fn shipped_example_config_is_valid() {
    let cfg: Config = toml::from_str(include_str!("../config.example.toml")).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.profile.skills[0].items[0], "Rust");
}
