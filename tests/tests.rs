// ../tests/tests.rs
use async_trait::async_trait;
use magic_tales::character::{PLACEHOLDER_IMAGE_URL, character_id_for};
use magic_tales::settings::Settings;
use magic_tales::*;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};

/// Replays canned model outputs and records every request it was sent.
#[derive(Default)]
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<Option<Value>, ProviderError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    fn replying(replies: Vec<Result<Option<Value>, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        })
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn invoke(&self, request: ModelRequest) -> Result<Option<Value>, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

fn reply(text: &str) -> Result<Option<Value>, ProviderError> {
    Ok(Some(json!({ "characterResponse": text })))
}

fn conjured_fixture() -> Value {
    let json_str = fs::read_to_string("tests/dummy_conjured_character.json")
        .expect("Failed to read dummy conjured character JSON file");
    let json_value: Value = serde_json::from_str(&json_str).expect("Failed to parse JSON");
    json_value["output"].clone()
}

#[tokio::test]
async fn test_elara_greets_traveler() {
    let provider = ScriptedProvider::replying(vec![reply("Greetings, traveler.")]);
    let engine = NarrativeEngine::new(provider.clone());

    let turn = engine.advance_narrative("Elara", "Hello", "").await.unwrap();

    assert_eq!(turn.ai_reply, "Greetings, traveler.");
    assert_eq!(turn.updated_story, "\nUser: Hello\nElara: Greetings, traveler.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].flow, "narrative_engine");
    assert!(requests[0].prompt.contains("You are an AI character named Elara."));
    assert!(requests[0].prompt.contains("\"Hello\""));
}

#[tokio::test]
async fn test_transcript_grows_one_turn_per_call() {
    let provider = ScriptedProvider::replying(vec![
        reply("The stars are restless tonight."),
        reply("Look to the Serpent's tail, Seeker."),
    ]);
    let engine = NarrativeEngine::new(provider.clone());
    let seed = "Elara waits atop the observatory.";

    let first = engine
        .advance_narrative("Elara", "Why are you here?", seed)
        .await
        .unwrap();
    assert_eq!(
        first.updated_story,
        format!("{seed}\nUser: Why are you here?\nElara: The stars are restless tonight.")
    );

    let second = engine
        .advance_narrative("Elara", "Where should I look?", &first.updated_story)
        .await
        .unwrap();
    assert!(second.updated_story.starts_with(&first.updated_story));
    assert_eq!(
        &second.updated_story[first.updated_story.len()..],
        "\nUser: Where should I look?\nElara: Look to the Serpent's tail, Seeker."
    );

    // The second prompt carries the first turn.
    assert!(provider.requests()[1].prompt.contains(&first.updated_story));
}

#[tokio::test]
async fn test_empty_replies_are_invalid() {
    let provider = ScriptedProvider::replying(vec![
        reply(""),
        reply("   \n"),
        Ok(None),
        Ok(Some(json!({ "somethingElse": "Hi" }))),
    ]);
    let engine = NarrativeEngine::new(provider);

    for _ in 0..4 {
        let result = engine.advance_narrative("Elara", "Hello", "story").await;
        assert!(matches!(result, Err(AIError::InvalidResponse(_))));
    }
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let provider = ScriptedProvider::replying(vec![Err(ProviderError::Timeout(120))]);
    let engine = NarrativeEngine::new(provider);

    let result = engine.advance_narrative("Elara", "Hello", "").await;
    assert!(matches!(
        result,
        Err(AIError::Provider(ProviderError::Timeout(120)))
    ));
}

#[tokio::test]
async fn test_conjure_from_fixture() {
    let provider = ScriptedProvider::replying(vec![Ok(Some(conjured_fixture()))]);
    let conjurer = CharacterConjurer::new(provider.clone());

    let bundle = conjurer.conjure_character(Some("pirates")).await.unwrap();

    assert_eq!(bundle.character_name, "Captain Mirelle Vane");
    assert_eq!(bundle.image_hint, "pirate captain");
    assert_eq!(bundle.suggested_question1, "What happened to the lighthouse?");
    assert_eq!(bundle.suggested_question3, "");
    assert!(bundle.validate().is_empty());

    let requests = provider.requests();
    assert_eq!(requests[0].flow, "generate_full_story_character");
    assert!(requests[0].prompt.contains("\"pirates\""));
    assert!(!requests[0].output.is_strict());
}

#[tokio::test]
async fn test_conjure_without_theme_or_questions() {
    let mut output = conjured_fixture();
    let fields = output.as_object_mut().unwrap();
    fields.remove("suggestedQuestion1");
    fields.remove("suggestedQuestion2");

    let provider = ScriptedProvider::replying(vec![Ok(Some(output))]);
    let conjurer = CharacterConjurer::new(provider.clone());

    let bundle = conjurer.conjure_character(Some("   ")).await.unwrap();

    assert_eq!(bundle.suggested_question1, "");
    assert_eq!(bundle.suggested_question2, "");
    assert_eq!(bundle.suggested_question3, "");
    assert!(
        provider.requests()[0]
            .prompt
            .contains("without specific keywords")
    );
}

#[tokio::test]
async fn test_conjure_without_output_fails() {
    let provider = ScriptedProvider::replying(vec![Ok(None)]);
    let conjurer = CharacterConjurer::new(provider);

    let result = conjurer.conjure_character(None).await;
    assert!(matches!(result, Err(AIError::GenerationFailed(_))));
}

#[tokio::test]
async fn test_conjure_provider_failure_propagates() {
    let provider = ScriptedProvider::replying(vec![Err(ProviderError::Timeout(5))]);
    let conjurer = CharacterConjurer::new(provider);

    let result = conjurer.conjure_character(Some("pirates")).await;
    assert!(matches!(
        result,
        Err(AIError::Provider(ProviderError::Timeout(5)))
    ));
}

#[tokio::test]
async fn test_conjure_with_null_required_field_fails() {
    let mut output = conjured_fixture();
    output["storyTeaser"] = Value::Null;
    let provider = ScriptedProvider::replying(vec![Ok(Some(output))]);
    let conjurer = CharacterConjurer::new(provider);

    let result = conjurer.conjure_character(None).await;
    assert!(matches!(result, Err(AIError::GenerationFailed(_))));
}

#[tokio::test]
async fn test_story_elements() {
    let provider = ScriptedProvider::replying(vec![
        Ok(Some(json!({ "storyElements": "A map that burns when lied to." }))),
        Ok(Some(json!({ "storyElements": "  " }))),
    ]);
    let generator = StoryElementsGenerator::new(provider.clone());

    let elements = generator
        .generate_story_elements("A smuggler captain.")
        .await
        .unwrap();
    assert_eq!(elements, "A map that burns when lied to.");
    assert!(
        provider.requests()[0]
            .prompt
            .contains("Character Prompt: A smuggler captain.")
    );

    let result = generator.generate_story_elements("A smuggler captain.").await;
    assert!(matches!(result, Err(AIError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_action_envelopes() {
    let provider = ScriptedProvider::replying(vec![reply("Greetings, traveler."), reply(" ")]);
    let engine = NarrativeEngine::new(provider);

    let ok = get_ai_response(&engine, "Elara", "Hello", "").await;
    assert!(ok.success);
    assert_eq!(ok.error, None);
    assert_eq!(
        ok.data.unwrap().updated_story,
        "\nUser: Hello\nElara: Greetings, traveler."
    );

    let failed = get_ai_response(&engine, "Elara", "Hello", "").await;
    assert!(!failed.success);
    assert!(failed.data.is_none());
    assert_eq!(failed.error.as_deref(), Some("Failed to get AI response."));

    let conjurer = CharacterConjurer::new(ScriptedProvider::replying(vec![Ok(None)]));
    let failed = conjure_new_character_story(&conjurer, None).await;
    assert_eq!(
        failed.into_result(),
        Err("Could not generate AI story. Please try again.".to_string())
    );

    let generator = StoryElementsGenerator::new(ScriptedProvider::replying(vec![Err(
        ProviderError::MissingApiKey,
    )]));
    let failed = generate_story_elements(&generator, "prompt").await;
    assert!(!failed.success);
    assert_eq!(
        failed.error.as_deref(),
        Some("Failed to generate story elements.")
    );
}

#[test]
fn test_action_response_serialization() {
    let failed: ActionResponse<String> = ActionResponse::failed("Failed to get AI response.");
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        json!({ "success": false, "error": "Failed to get AI response." })
    );

    let ok = ActionResponse::ok(NarrativeTurn {
        ai_reply: "Hi".into(),
        updated_story: "\nUser: Hello\nElara: Hi".into(),
    });
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({
            "success": true,
            "data": { "aiReply": "Hi", "updatedStory": "\nUser: Hello\nElara: Hi" }
        })
    );
}

#[test]
fn test_review_bounds() {
    let bundle: ProvisioningResult = serde_json::from_value(conjured_fixture()).unwrap();
    assert!(bundle.validate().is_empty());

    let broken = ProvisioningResult {
        character_name: "Al".into(),
        ai_definition: "Too short.".into(),
        suggested_question2: "?".repeat(151),
        ..bundle
    };
    let fields: Vec<&str> = broken.validate().iter().map(|v| v.field).collect();
    assert_eq!(fields, ["characterName", "aiDefinition", "suggestedQuestion2"]);
}

#[test]
fn test_character_from_provisioning() {
    let bundle: ProvisioningResult = serde_json::from_value(conjured_fixture()).unwrap();
    let id = character_id_for(&bundle.character_name);
    let character =
        CharacterPersona::from_provisioning(id.clone(), bundle.clone(), PLACEHOLDER_IMAGE_URL);

    assert_eq!(character.id, id);
    assert_eq!(character.name, bundle.character_name);
    assert_eq!(character.description, bundle.story_teaser);
    assert_eq!(character.initial_greeting, bundle.initial_greeting);
    assert_eq!(character.story_prompt(), bundle.ai_definition);
    assert_eq!(character.initial_story_context(), bundle.ai_definition);
    assert_eq!(character.quest_objective.as_deref(), Some(bundle.player_quest.as_str()));
    assert_eq!(character.image_hint.as_deref(), Some("pirate captain"));

    let repository = InMemoryCharacterRepository::with_placeholders();
    assert!(repository.find_by_id(&id).is_none());
    repository.insert(character.clone());
    assert_eq!(repository.find_by_id(&id), Some(character));
}

#[test]
fn test_placeholder_lookup() {
    let repository = InMemoryCharacterRepository::with_placeholders();
    let elara = repository.find_by_id("elara").expect("Elara is a placeholder");
    assert_eq!(elara.name, "Elara");
    assert_eq!(
        elara.initial_greeting,
        "Greetings, traveler. The stars have foretold your arrival. What secrets of the cosmos do you seek?"
    );
    assert!(repository.find_by_id("nobody").is_none());
}

#[test]
fn test_transcript_append_is_pure() {
    let transcript = Transcript::new("Once upon a time.");
    let next = transcript.append(&Turn::new("Elara", "Hello", "Greetings, traveler."));
    assert_eq!(transcript.as_str(), "Once upon a time.");
    assert_eq!(
        next.as_str(),
        "Once upon a time.\nUser: Hello\nElara: Greetings, traveler."
    );
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        openai_api_key: Some("sk-test".into()),
        model: "gpt-4o".into(),
        base_url: Some("http://localhost:11434/v1".into()),
        temperature: 0.2,
        request_timeout_secs: 30,
        debug_mode: true,
    };
    settings.save_to_file(&path).unwrap();

    let loaded = Settings::load_settings_from_file(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.api_key().as_deref(), Some("sk-test"));
}

#[test]
fn test_settings_fill_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "model": "gpt-4.1-mini" }"#).unwrap();

    let loaded = Settings::load_settings_from_file(&path).unwrap();
    assert_eq!(loaded.model, "gpt-4.1-mini");
    assert_eq!(loaded.temperature, 0.7);
    assert_eq!(loaded.request_timeout_secs, 120);
    assert!(!loaded.debug_mode);
}

#[test]
fn test_malformed_settings_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "model": gpt-4.1-mini }"#).unwrap();

    let error = Settings::load_settings_from_file(&path).unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
}
