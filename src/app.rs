// /app.rs
use crate::context::Context;
use crate::tui::{Tui, TuiEvent};
use crate::ui::{Catalog, ChatView, Component, spinner::Spinner};
use crate::{
    actions::{self, ActionResponse},
    character::{
        CharacterPersona, CharacterRepository, InMemoryCharacterRepository,
        PLACEHOLDER_IMAGE_URL, character_id_for,
    },
    conjure::{CharacterConjurer, ProvisioningResult},
    error::AppError,
    narrative::{NarrativeEngine, NarrativeTurn},
    provider::ModelProvider,
    settings::Settings,
    story_elements::StoryElementsGenerator,
};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub enum Action {
    Quit,
    SwitchComponent(Box<dyn Component>),
    OpenChat(String),
    SubmitTurn(TurnRequest),
    Conjure(Option<String>),
    GenerateStoryElements(String),
    AcceptCharacter(ProvisioningResult),
}

/// One chat line on its way to the model, tagged with the conversation that
/// sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub session: Uuid,
    pub character_name: String,
    pub user_input: String,
    pub story_so_far: String,
}

#[derive(Debug, Clone)]
pub enum ModelResponse {
    Turn {
        session: Uuid,
        response: ActionResponse<NarrativeTurn>,
    },
    Conjured(ActionResponse<ProvisioningResult>),
    StoryElements(ActionResponse<String>),
}

pub struct App {
    // Application state and control flow
    running: bool,
    component: Box<dyn Component>,
    notice: Option<String>,

    // --- Global information
    settings: Settings,
    repository: Arc<InMemoryCharacterRepository>,
    characters: Vec<CharacterPersona>,

    // --- Flows, all sharing one provider
    engine: NarrativeEngine,
    conjurer: CharacterConjurer,
    story_elements: StoryElementsGenerator,

    // --- UI elements
    spinner: Spinner,

    response_sender: mpsc::UnboundedSender<ModelResponse>,
    response_receiver: mpsc::UnboundedReceiver<ModelResponse>,
}

impl App {
    pub fn new(settings: Settings, provider: Arc<dyn ModelProvider>) -> Self {
        let (response_sender, response_receiver) = mpsc::unbounded_channel();
        let repository = Arc::new(InMemoryCharacterRepository::with_placeholders());
        let characters = repository.list();

        Self {
            running: true,
            component: Box::new(Catalog::default()),
            notice: None,

            settings,
            repository,
            characters,

            engine: NarrativeEngine::new(provider.clone()),
            conjurer: CharacterConjurer::new(provider.clone()),
            story_elements: StoryElementsGenerator::new(provider),

            spinner: Spinner::new(),

            response_sender,
            response_receiver,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(10.0) // spinner speed
            .frame_rate(30.0);

        tui.enter()?;

        while self.running {
            tokio::select! {
                event = tui.next() => match event {
                    Some(event) => self.handle_tui_event(event, &mut tui)?,
                    None => break,
                },
                Some(response) = self.response_receiver.recv() => self.handle_response(response),
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_tui_event(&mut self, event: TuiEvent, tui: &mut Tui) -> Result<()> {
        match event {
            TuiEvent::Key(key_event) => self.on_key(key_event),
            TuiEvent::Tick => {
                if self.component.is_waiting() {
                    self.spinner.next_frame();
                }
            }
            TuiEvent::Render => self.draw(tui)?,
            TuiEvent::Error => log::warn!("Failed to read a terminal event"),
            TuiEvent::Init | TuiEvent::Paste(_) | TuiEvent::Resize(_, _) => {}
        }
        Ok(())
    }

    fn draw(&self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            let context = Context {
                characters: &self.characters,
                settings: &self.settings,
                spinner: &self.spinner,
                notice: self.notice.as_deref(),
            };
            self.component
                .render(frame.area(), frame.buffer_mut(), &context)
        })?;
        Ok(())
    }

    fn on_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.running = false;
            return;
        }

        let context = Context {
            characters: &self.characters,
            settings: &self.settings,
            spinner: &self.spinner,
            notice: self.notice.as_deref(),
        };
        let action = self.component.on_key(key_event, context);
        self.notice = None;
        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_response(&mut self, response: ModelResponse) {
        if let Some(action) = self.component.on_response(response) {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SwitchComponent(component) => self.component = component,
            Action::OpenChat(id) => self.open_chat(&id),
            Action::SubmitTurn(request) => self.submit_turn(request),
            Action::Conjure(theme) => {
                let conjurer = self.conjurer.clone();
                let sender = self.response_sender.clone();
                tokio::spawn(async move {
                    let response =
                        actions::conjure_new_character_story(&conjurer, theme.as_deref()).await;
                    let _ = sender.send(ModelResponse::Conjured(response));
                });
            }
            Action::GenerateStoryElements(prompt) => {
                let generator = self.story_elements.clone();
                let sender = self.response_sender.clone();
                tokio::spawn(async move {
                    let response = actions::generate_story_elements(&generator, &prompt).await;
                    let _ = sender.send(ModelResponse::StoryElements(response));
                });
            }
            Action::AcceptCharacter(bundle) => self.accept_character(bundle),
        }
    }

    fn open_chat(&mut self, id: &str) {
        match self.repository.find_by_id(id) {
            Some(character) => {
                log::info!("Opening chat with {}", character.name);
                self.component = Box::new(ChatView::new(character));
            }
            None => {
                let error = AppError::CharacterNotFound(id.to_string());
                log::error!("{error}");
                self.notice = Some(error.to_string());
            }
        }
    }

    fn submit_turn(&self, request: TurnRequest) {
        let engine = self.engine.clone();
        let sender = self.response_sender.clone();
        tokio::spawn(async move {
            let response = actions::get_ai_response(
                &engine,
                &request.character_name,
                &request.user_input,
                &request.story_so_far,
            )
            .await;
            // Nobody is listening once the app has quit.
            let _ = sender.send(ModelResponse::Turn {
                session: request.session,
                response,
            });
        });
    }

    fn accept_character(&mut self, bundle: ProvisioningResult) {
        let id = character_id_for(&bundle.character_name);
        let character = CharacterPersona::from_provisioning(id, bundle, PLACEHOLDER_IMAGE_URL);
        log::info!("Adding {} ({}) to the catalog", character.name, character.id);

        self.repository.insert(character.clone());
        self.characters = self.repository.list();
        self.notice = Some(format!("{} joined the catalog", character.name));
        self.component = Box::new(ChatView::new(character));
    }
}
