//! End-to-end swap sequence against an in-memory page.

use std::collections::HashMap;

use softnav::prelude::*;
use softnav::swap::mark_active_nav;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Loading(bool),
    UpdateHead(HeadTag, String),
    AppendHead(HeadTag, String),
    Replace(String),
    Push(String),
    FragmentScroll(String),
    ScrollTop,
    Reinit,
    HardNavigate(String),
}

/// Parsed nodes are their markup.
struct FakePage {
    location: Url,
    has_container: bool,
    container: String,
    title: String,
    /// Value attribute of each head element the page currently has.
    head: HashMap<HeadTag, String>,
    page_id: Option<String>,
    nav: Vec<(String, bool)>,
    history: Vec<HistoryState>,
    loading: bool,
    calls: Vec<Call>,
    /// Response bodies this fake knows how to "parse".
    documents: HashMap<String, ParsedPage<String>>,
}

impl FakePage {
    fn at(url: &str) -> Self {
        Self {
            location: Url::parse(url).unwrap(),
            has_container: true,
            container: "home".to_string(),
            title: "Home".to_string(),
            head: HashMap::new(),
            page_id: Some("home".to_string()),
            nav: vec![
                ("/".to_string(), true),
                ("/about.html".to_string(), false),
                ("/gallery/index.html".to_string(), false),
                ("/about.html#team".to_string(), false),
            ],
            history: Vec::new(),
            loading: false,
            calls: Vec::new(),
            documents: HashMap::new(),
        }
    }

    fn with_head(mut self, tag: HeadTag, value: &str) -> Self {
        self.head.insert(tag, value.to_string());
        self
    }

    fn serve(&mut self, body: &str, page: ParsedPage<String>) {
        self.documents.insert(body.to_string(), page);
    }

    fn head_value(&self, tag: HeadTag) -> Option<&str> {
        self.head.get(&tag).map(String::as_str)
    }

    fn head_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::UpdateHead(..) | Call::AppendHead(..)))
            .cloned()
            .collect()
    }

    fn active_links(&self) -> Vec<&str> {
        self.nav
            .iter()
            .filter(|(_, active)| *active)
            .map(|(href, _)| href.as_str())
            .collect()
    }
}

impl Host for FakePage {
    type Node = String;

    fn location(&self) -> Url {
        self.location.clone()
    }

    fn has_container(&self) -> bool {
        self.has_container
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.calls.push(Call::Loading(loading));
    }

    fn parse(&mut self, html: &str) -> ParsedPage<String> {
        self.documents
            .get(html)
            .cloned()
            .unwrap_or_else(ParsedPage::empty)
    }

    fn set_page_id(&mut self, id: &str) {
        self.page_id = Some(id.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn has_head(&self, tag: HeadTag) -> bool {
        self.head.contains_key(&tag)
    }

    fn update_head(&mut self, tag: HeadTag, value: &str) {
        self.calls.push(Call::UpdateHead(tag, value.to_string()));
        if let Some(current) = self.head.get_mut(&tag) {
            *current = value.to_string();
        }
    }

    fn append_head(&mut self, tag: HeadTag, node: String) {
        self.calls.push(Call::AppendHead(tag, node.clone()));
        // Value of the appended markup, as the next swap would see it.
        let value = node
            .split('"')
            .nth(3)
            .unwrap_or_default()
            .to_string();
        self.head.insert(tag, value);
    }

    fn replace_container(&mut self, container: String) {
        self.calls.push(Call::Replace(container.clone()));
        self.container = container;
    }

    fn nav_hrefs(&mut self) -> Vec<String> {
        self.nav.iter().map(|(h, _)| h.clone()).collect()
    }

    fn set_nav_active(&mut self, index: usize, active: bool) {
        self.nav[index].1 = active;
    }

    fn push_history(&mut self, state: &HistoryState) {
        self.history.push(state.clone());
        self.location = Url::parse(&state.url).unwrap();
        self.calls.push(Call::Push(state.url.clone()));
    }

    fn schedule_fragment_scroll(&mut self, id: &str) {
        self.calls.push(Call::FragmentScroll(id.to_string()));
    }

    fn scroll_to_top(&mut self) {
        self.calls.push(Call::ScrollTop);
    }

    fn reinitialize(&mut self) {
        self.calls.push(Call::Reinit);
    }

    fn hard_navigate(&mut self, url: &Url) {
        self.calls.push(Call::HardNavigate(url.to_string()));
    }
}

const ABOUT_DESCRIPTION: &str = r#"<meta name="description" content="Who I am" data-hid="desc">"#;
const ABOUT_CANONICAL: &str = r#"<link rel="canonical" href="https://site.example/about.html">"#;

fn document(container: Option<&str>) -> ParsedPage<String> {
    ParsedPage {
        container: container.map(str::to_string),
        ..ParsedPage::empty()
    }
}

fn about_page() -> ParsedPage<String> {
    ParsedPage {
        meta: PageMeta {
            title: Some("About | Donnie".to_string()),
            page_id: Some("about".to_string()),
        },
        description: Some(HeadElement {
            value: "Who I am".to_string(),
            node: ABOUT_DESCRIPTION.to_string(),
        }),
        canonical: Some(HeadElement {
            value: "https://site.example/about.html".to_string(),
            node: ABOUT_CANONICAL.to_string(),
        }),
        container: Some("about".to_string()),
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn successful_swap_updates_head_history_and_nav() {
    let mut page = FakePage::at("https://site.example/")
        .with_head(HeadTag::Description, "Home page")
        .with_head(HeadTag::Canonical, "https://site.example/");
    page.serve("<about>", about_page());
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .expect("container present");
    assert!(page.loading);

    let outcome = nav.complete(&mut page, &req, Ok(FetchedPage::ok("<about>")));

    assert_eq!(outcome, SwapOutcome::Swapped);
    assert!(!page.loading);
    assert_eq!(page.title, "About | Donnie");
    assert_eq!(page.head_value(HeadTag::Description), Some("Who I am"));
    assert_eq!(
        page.head_value(HeadTag::Canonical),
        Some("https://site.example/about.html")
    );
    assert_eq!(page.page_id.as_deref(), Some("about"));
    assert_eq!(page.container, "about");
    assert_eq!(
        page.history,
        vec![HistoryState::new("https://site.example/about.html")]
    );
    assert_eq!(page.active_links(), vec!["/about.html"]);
    assert_eq!(
        page.calls,
        vec![
            Call::Loading(true),
            Call::UpdateHead(HeadTag::Description, "Who I am".to_string()),
            Call::UpdateHead(
                HeadTag::Canonical,
                "https://site.example/about.html".to_string()
            ),
            Call::Replace("about".to_string()),
            Call::Push("https://site.example/about.html".to_string()),
            Call::ScrollTop,
            Call::Reinit,
            Call::Loading(false),
        ]
    );
}

#[test]
fn non_success_status_falls_back_and_clears_loading() {
    let mut page = FakePage::at("https://site.example/");
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/missing.html"), true)
        .unwrap();
    let outcome = nav.complete(
        &mut page,
        &req,
        Ok(FetchedPage {
            status: 404,
            body: "not found".to_string(),
        }),
    );

    assert_eq!(outcome, SwapOutcome::FellBack(SwapError::status(404)));
    assert!(!page.loading);
    assert!(page.history.is_empty());
    assert_eq!(page.title, "Home");
    assert_eq!(
        page.calls,
        vec![
            Call::Loading(true),
            Call::HardNavigate("https://site.example/missing.html".to_string()),
            Call::Loading(false),
        ]
    );
}

#[test]
fn network_error_falls_back() {
    let mut page = FakePage::at("https://site.example/");
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .unwrap();
    let outcome = nav.complete(&mut page, &req, Err(SwapError::network("TypeError: offline")));

    assert!(matches!(
        outcome,
        SwapOutcome::FellBack(SwapError::Fetch { status: None, .. })
    ));
    assert!(!page.loading);
    assert!(page
        .calls
        .contains(&Call::HardNavigate("https://site.example/about.html".to_string())));
}

#[test]
fn response_without_container_is_not_applied() {
    let mut page = FakePage::at("https://site.example/");
    page.serve(
        "<bare>",
        ParsedPage {
            container: None,
            ..about_page()
        },
    );
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/bare.html"), true)
        .unwrap();
    let outcome = nav.complete(&mut page, &req, Ok(FetchedPage::ok("<bare>")));

    assert_eq!(
        outcome,
        SwapOutcome::FellBack(SwapError::MissingContainer("#pjax-container".to_string()))
    );
    // Nothing from the failed document leaks into the page.
    assert_eq!(page.title, "Home");
    assert!(page.head.is_empty());
    assert!(page.head_calls().is_empty());
    assert_eq!(page.page_id.as_deref(), Some("home"));
    assert_eq!(page.container, "home");
    assert!(!page.loading);
}

#[test]
fn fragment_target_is_scrolled_after_swap() {
    let mut page = FakePage::at("https://site.example/");
    page.serve("<page>", document(Some("page")));
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/page#section"), true)
        .unwrap();
    nav.complete(&mut page, &req, Ok(FetchedPage::ok("<page>")));

    assert!(page.calls.contains(&Call::FragmentScroll("section".to_string())));
    assert!(!page.calls.contains(&Call::ScrollTop));
    // The scroll is scheduled before reinitialization runs; the host defers it.
    let scroll_at = page
        .calls
        .iter()
        .position(|c| *c == Call::FragmentScroll("section".to_string()))
        .unwrap();
    let reinit_at = page.calls.iter().position(|c| *c == Call::Reinit).unwrap();
    assert!(scroll_at < reinit_at);
}

#[test]
fn pop_state_replays_without_new_history_entry() {
    let mut page = FakePage::at("https://site.example/");
    page.serve("<about>", about_page());
    page.serve("<home>", document(Some("home")));
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .unwrap();
    nav.complete(&mut page, &req, Ok(FetchedPage::ok("<about>")));
    assert_eq!(page.history.len(), 1);

    // Back to the first page, whose entry was never pushed by us.
    page.location = url("https://site.example/");
    let req = nav.begin_pop(&mut page, None).unwrap();
    assert!(!req.push);
    assert_eq!(req.url.as_str(), "https://site.example/");
    nav.complete(&mut page, &req, Ok(FetchedPage::ok("<home>")));

    // Forward again via the recorded state.
    let state = HistoryState::new("https://site.example/about.html");
    let req = nav.begin_pop(&mut page, Some(&state)).unwrap();
    assert_eq!(req.url.as_str(), "https://site.example/about.html");
    let outcome = nav.complete(&mut page, &req, Ok(FetchedPage::ok("<about>")));

    assert_eq!(outcome, SwapOutcome::Swapped);
    assert_eq!(page.history.len(), 1);
    assert_eq!(page.container, "about");
}

#[test]
fn superseded_response_is_dropped() {
    let mut page = FakePage::at("https://site.example/");
    page.serve("<about>", about_page());
    page.serve("<gallery>", document(Some("gallery")));
    let mut nav = Navigator::new(SiteConfig::default());

    let slow = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .unwrap();
    let fast = nav
        .begin(&mut page, url("https://site.example/gallery/"), true)
        .unwrap();

    assert_eq!(
        nav.complete(&mut page, &fast, Ok(FetchedPage::ok("<gallery>"))),
        SwapOutcome::Swapped
    );
    assert!(!page.loading);

    // The older request settles last, even as a failure: no swap, no fallback.
    assert_eq!(
        nav.complete(&mut page, &slow, Err(SwapError::network("AbortError"))),
        SwapOutcome::Superseded
    );
    assert_eq!(page.container, "gallery");
    assert_eq!(page.history.len(), 1);
    assert!(!page.calls.iter().any(|c| matches!(c, Call::HardNavigate(_))));
    assert_eq!(page.active_links(), vec!["/gallery/index.html"]);
}

#[test]
fn superseded_request_leaves_loading_to_newer_one() {
    let mut page = FakePage::at("https://site.example/");
    page.serve("<about>", about_page());
    let mut nav = Navigator::new(SiteConfig::default());

    let old = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .unwrap();
    let _newer = nav
        .begin(&mut page, url("https://site.example/gallery/"), true)
        .unwrap();

    nav.complete(&mut page, &old, Ok(FetchedPage::ok("<about>")));
    assert!(page.loading);
}

#[test]
fn page_without_container_is_not_intercepted() {
    let mut page = FakePage::at("https://site.example/");
    page.has_container = false;
    let mut nav = Navigator::new(SiteConfig::default());

    assert!(nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .is_none());
    assert!(page.calls.is_empty());
    assert_eq!(nav.generation(), 0);
}

#[test]
fn startup_marks_current_page_active() {
    let mut page = FakePage::at("https://site.example/about.html");
    let current = page.location();
    mark_active_nav(&mut page, &current);
    assert_eq!(page.active_links(), vec!["/about.html"]);
}

#[test]
fn head_elements_missing_from_current_page_are_appended() {
    let mut page = FakePage::at("https://site.example/");
    page.serve("<about>", about_page());
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .unwrap();
    nav.complete(&mut page, &req, Ok(FetchedPage::ok("<about>")));

    // The whole parsed element goes in, extra attributes included.
    assert_eq!(
        page.head_calls(),
        vec![
            Call::AppendHead(HeadTag::Description, ABOUT_DESCRIPTION.to_string()),
            Call::AppendHead(HeadTag::Canonical, ABOUT_CANONICAL.to_string()),
        ]
    );
    assert_eq!(page.head_value(HeadTag::Description), Some("Who I am"));
}

#[test]
fn head_elements_absent_from_new_page_are_left_alone() {
    let mut page = FakePage::at("https://site.example/")
        .with_head(HeadTag::Description, "Home page")
        .with_head(HeadTag::Canonical, "https://site.example/");
    page.serve(
        "<about>",
        ParsedPage {
            description: None,
            ..about_page()
        },
    );
    let mut nav = Navigator::new(SiteConfig::default());

    let req = nav
        .begin(&mut page, url("https://site.example/about.html"), true)
        .unwrap();
    let outcome = nav.complete(&mut page, &req, Ok(FetchedPage::ok("<about>")));

    assert_eq!(outcome, SwapOutcome::Swapped);
    assert_eq!(page.head_value(HeadTag::Description), Some("Home page"));
    assert_eq!(
        page.head_calls(),
        vec![Call::UpdateHead(
            HeadTag::Canonical,
            "https://site.example/about.html".to_string()
        )]
    );
}

#[test]
fn empty_or_absent_page_id_keeps_current_one() {
    let mut page = FakePage::at("https://site.example/");
    page.serve(
        "<blank-id>",
        ParsedPage {
            meta: PageMeta {
                title: None,
                page_id: Some(String::new()),
            },
            ..document(Some("blank"))
        },
    );
    page.serve("<no-id>", document(Some("plain")));
    let mut nav = Navigator::new(SiteConfig::default());

    for body in ["<blank-id>", "<no-id>"] {
        let req = nav
            .begin(&mut page, url("https://site.example/other.html"), true)
            .unwrap();
        assert_eq!(
            nav.complete(&mut page, &req, Ok(FetchedPage::ok(body))),
            SwapOutcome::Swapped
        );
        assert_eq!(page.page_id.as_deref(), Some("home"), "{body}");
        assert_eq!(page.title, "Home", "{body}");
    }
}
