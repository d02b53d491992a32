/// MCP server implementation for portfolio search.
///
/// Exposes seven tools:
/// - `search_portfolio`: Feed the current search-box value into the session
/// - `clear_search`: Reset every highlight, as the clear control does
/// - `get_highlights`: Current highlight/visibility flags for every item
/// - `get_card`: Look up a card by id
/// - `list_section`: List the cards of a section
/// - `list_synonyms`: Show the active synonym table
/// - `reload_portfolio`: Re-read the content document and rebuild the registry
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::RwLock;
use tracing::info;

use portfolio_core::mcp_api::{
    CardDetailResponse, CardFlags, CardMatchResult, CardSummary, GetCardParams,
    HighlightsResponse, LinkFlags, LinkResult, ListSectionParams, NoticePayload,
    ReloadPortfolioResponse, SearchPortfolioParams, SearchPortfolioResponse,
    SectionDetailResponse, SectionFlags, SectionSummary, SynonymListResponse,
};
use portfolio_core::model::{Card, CardId, Registry, SectionId};
use portfolio_core::search::SearchResult;
use portfolio_core::session::{SearchSession, SessionState};

use crate::error::AppError;
use crate::update::{LoadedPortfolio, ReloadService};

// --- MCP Server ---

/// Shared application state. Every input event takes the write lock, so
/// passes over the corpus never interleave.
pub struct AppState {
    pub session: SearchSession,
    pub fingerprint: String,
}

#[derive(Clone)]
pub struct PortfolioSearchServer {
    state: Arc<RwLock<AppState>>,
    reload_service: Arc<ReloadService>,
    tool_router: ToolRouter<PortfolioSearchServer>,
}

impl PortfolioSearchServer {
    pub fn new(portfolio: LoadedPortfolio, reload_service: ReloadService) -> Self {
        let state = Arc::new(RwLock::new(AppState {
            session: SearchSession::new(portfolio.registry, portfolio.synonyms),
            fingerprint: portfolio.fingerprint,
        }));

        Self {
            state,
            reload_service: Arc::new(reload_service),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PortfolioSearchServer {
    #[tool(description = "Search the portfolio as the page's search box does. Pass the full current input value; an empty value clears the search. Matches cards (skills, experience, projects, certifications) and sidebar links by substring, all-terms and synonym rules, and returns highlights, the scroll target and a no-results notice.")]
    async fn search_portfolio(
        &self,
        Parameters(params): Parameters<SearchPortfolioParams>,
    ) -> Result<Json<SearchPortfolioResponse>, String> {
        let mut state = self.state.write().await;
        state.session.on_input(&params.query);

        let session = &state.session;
        let response = match session.state() {
            SessionState::Idle => cleared_response(),
            SessionState::Searching(result) => to_api_search(session.registry(), result),
        };
        info!(
            query = response.query.as_deref().unwrap_or_default(),
            any_match = response.any_match,
            cards = response.cards.len(),
            "search_portfolio"
        );
        Ok(Json(response))
    }

    #[tool(description = "Clear the current search: remove every highlight and the no-results notice.")]
    async fn clear_search(&self) -> Result<Json<SearchPortfolioResponse>, String> {
        let mut state = self.state.write().await;
        state.session.clear();
        Ok(Json(cleared_response()))
    }

    #[tool(description = "Get the highlighted/visible flags of every card, section and link for the current search, plus scroll target and notice.")]
    async fn get_highlights(&self) -> Result<Json<HighlightsResponse>, String> {
        let state = self.state.read().await;
        let session = &state.session;
        let highlights = session.highlights();

        let query = match session.state() {
            SessionState::Idle => None,
            SessionState::Searching(result) => Some(result.query.to_string()),
        };

        Ok(Json(HighlightsResponse {
            query,
            cards: highlights
                .cards()
                .map(|(id, flags)| CardFlags { id, flags })
                .collect(),
            sections: highlights
                .sections()
                .map(|(id, flags)| SectionFlags { id, flags })
                .collect(),
            links: highlights
                .links()
                .map(|(id, flags)| LinkFlags { id, flags })
                .collect(),
            scroll_target: highlights.scroll_target(),
            notice: highlights.notice().map(NoticePayload::from),
        }))
    }

    #[tool(description = "Get the full content of a portfolio card by id, including its skill tags when it is a skill category.")]
    async fn get_card(
        &self,
        Parameters(params): Parameters<GetCardParams>,
    ) -> Result<Json<CardDetailResponse>, String> {
        let state = self.state.read().await;
        let registry = state.session.registry();
        let card = registry
            .card(CardId(params.card_id))
            .ok_or_else(|| AppError::NotFound(params.card_id.to_string()).to_string())?;

        Ok(Json(CardDetailResponse {
            id: card.id,
            kind: card.kind,
            title: card.title.clone(),
            text: card.text.clone(),
            section: section_title(registry, card.section),
            parent: card
                .parent
                .and_then(|id| registry.card(id))
                .map(to_card_summary),
            children: registry.children_of(card.id).map(to_card_summary).collect(),
        }))
    }

    #[tool(description = "List a portfolio section and its cards by section title (case-insensitive), e.g. 'Projects' or 'Skills'.")]
    async fn list_section(
        &self,
        Parameters(params): Parameters<ListSectionParams>,
    ) -> Result<Json<SectionDetailResponse>, String> {
        let title = params.section.trim().to_string();
        if title.is_empty() {
            return Err("section must not be empty".to_string());
        }

        let state = self.state.read().await;
        let registry = state.session.registry();
        let section = registry.find_section(&title).ok_or_else(|| {
            let available: Vec<&str> = registry
                .sections()
                .iter()
                .filter_map(|s| s.title.as_deref())
                .collect();
            format!(
                "{}. Available sections: {}",
                AppError::UnknownSection(title.clone()),
                available.join(", ")
            )
        })?;

        Ok(Json(SectionDetailResponse {
            id: section.id,
            title: section.title.clone(),
            body: section.body.clone(),
            cards: registry.section_cards(section).map(to_card_summary).collect(),
        }))
    }

    #[tool(description = "List the synonym table used to broaden matches (e.g. 'cv' -> 'computer vision', 'opencv'), in lookup order.")]
    async fn list_synonyms(&self) -> Result<Json<SynonymListResponse>, String> {
        let state = self.state.read().await;
        Ok(Json(SynonymListResponse {
            entries: state.session.synonyms().entries().to_vec(),
        }))
    }

    #[tool(description = "Re-read the portfolio content document and rebuild the search registry if it changed. Resets the current search when it does.")]
    async fn reload_portfolio(&self) -> Result<Json<ReloadPortfolioResponse>, String> {
        info!("reload_portfolio tool invoked");

        let current = self.state.read().await.fingerprint.clone();
        let result = self
            .reload_service
            .reload(&current)
            .map_err(|e| format!("reload failed: {e}"))?;

        let mut state = self.state.write().await;
        if let Some(portfolio) = result.portfolio {
            state.session = SearchSession::new(portfolio.registry, portfolio.synonyms);
            info!(
                cards = state.session.registry().cards().len(),
                "in-memory registry replaced"
            );
        }
        state.fingerprint = result.fingerprint.clone();

        let registry = state.session.registry();
        Ok(Json(ReloadPortfolioResponse {
            updated: result.updated,
            fingerprint: result.fingerprint,
            section_count: registry.sections().len(),
            card_count: registry.cards().len(),
            link_count: registry.links().len(),
        }))
    }
}

fn cleared_response() -> SearchPortfolioResponse {
    SearchPortfolioResponse {
        cleared: true,
        query: None,
        any_match: false,
        cards: Vec::new(),
        links: Vec::new(),
        sections: Vec::new(),
        scroll_target: None,
        revealed: Vec::new(),
        carousel_focus: None,
        notice: None,
    }
}

fn to_api_search(registry: &Registry, result: &SearchResult) -> SearchPortfolioResponse {
    let cards = result
        .cards
        .iter()
        .filter_map(|m| {
            let card = registry.card(m.card)?;
            Some(CardMatchResult {
                id: card.id,
                kind: card.kind,
                title: card.title.clone(),
                section: section_title(registry, card.section),
                reason: m.reason.clone(),
            })
        })
        .collect();

    let links = result
        .links
        .iter()
        .filter_map(|m| {
            let link = registry.link(m.link)?;
            Some(LinkResult {
                id: link.id,
                label: link.label.clone(),
                url: link.url.clone(),
                reason: m.reason.clone(),
            })
        })
        .collect();

    let sections = result
        .sections
        .iter()
        .filter_map(|id| registry.section(*id))
        .map(|s| SectionSummary {
            id: s.id,
            title: s.title.clone(),
            card_count: s.cards.len(),
        })
        .collect();

    SearchPortfolioResponse {
        cleared: false,
        query: Some(result.query.to_string()),
        any_match: result.any_match(),
        cards,
        links,
        sections,
        scroll_target: result.first_match(),
        revealed: result.revealed.clone(),
        carousel_focus: result.carousel_focus,
        notice: result.notice().as_ref().map(NoticePayload::from),
    }
}

fn to_card_summary(card: &Card) -> CardSummary {
    CardSummary {
        id: card.id,
        kind: card.kind,
        title: card.title.clone(),
    }
}

fn section_title(registry: &Registry, id: SectionId) -> Option<String> {
    registry.section(id).and_then(|s| s.title.clone())
}

#[tool_handler]
impl ServerHandler for PortfolioSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "portfolio-search".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Portfolio search MCP server. Mirrors the portfolio page's search box: \
                 call search_portfolio with the full current input on every change, \
                 clear_search to reset, get_highlights to render flags, get_card and \
                 list_section to browse content, list_synonyms to inspect abbreviation \
                 expansion, and reload_portfolio after the content document changes."
                    .to_string(),
            ),
        }
    }
}
