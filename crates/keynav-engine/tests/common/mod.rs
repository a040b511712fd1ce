//! In-memory browser fake backing the engine integration tests.
//!
//! All three capability traits are implemented on [`SharedBrowser`], a
//! cloneable handle to one `FakeBrowser`, so one shared fake can be handed
//! to the engine three times and inspected from the test afterwards.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use url::Url;

use keynav_engine::{
    CapResult, CapabilityError, ConsoleOps, ContentOps, Tab, TabId, TabOps,
};

/// Install a tracing subscriber so `--nocapture` runs show engine traces.
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One recorded console-surface call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCall {
    Command(TabId, String),
    Find(TabId),
    Hide(TabId),
}

#[derive(Debug, Default)]
struct State {
    tabs: Vec<Tab>,
    scroll: HashMap<TabId, (i32, i32)>,
    zoom: HashMap<TabId, f64>,
    viewport: (i32, i32),
    page: (i32, i32),
    next_id: u32,
    removed: Vec<TabId>,
    created: Vec<Url>,
    windows: Vec<Url>,
    navigations: Vec<(TabId, Url)>,
    reloads: Vec<(TabId, bool)>,
    reopened: u32,
    history: Vec<(TabId, i32)>,
    console: Vec<ConsoleCall>,
}

/// Shared in-memory browser.
#[derive(Debug)]
pub struct FakeBrowser {
    state: RefCell<State>,
}

/// Cloneable handle to a [`FakeBrowser`]; this is the type that implements
/// the capability traits (a plain `Rc<FakeBrowser>` would violate the
/// orphan rule in an integration-test crate).
#[derive(Debug, Clone)]
pub struct SharedBrowser(Rc<FakeBrowser>);

impl std::ops::Deref for SharedBrowser {
    type Target = FakeBrowser;

    fn deref(&self) -> &FakeBrowser {
        &self.0
    }
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

impl FakeBrowser {
    /// A browser with the given tabs open; the first one is active.
    pub fn with_tabs(urls: &[&str]) -> SharedBrowser {
        let mut state = State {
            viewport: (800, 600),
            page: (1600, 3000),
            next_id: urls.len() as u32 + 1,
            ..State::default()
        };
        for (i, addr) in urls.iter().enumerate() {
            let id = TabId(i as u32 + 1);
            state.tabs.push(Tab {
                id,
                index: i,
                url: url(addr),
                title: format!("tab {}", i + 1),
                active: i == 0,
                pinned: false,
            });
            state.scroll.insert(id, (0, 0));
        }
        SharedBrowser(Rc::new(Self {
            state: RefCell::new(state),
        }))
    }

    pub fn set_title(&self, id: TabId, title: &str) {
        let mut s = self.state.borrow_mut();
        if let Some(tab) = s.tabs.iter_mut().find(|t| t.id == id) {
            tab.title = title.to_string();
        }
    }

    pub fn set_pinned_flag(&self, id: TabId, pinned: bool) {
        let mut s = self.state.borrow_mut();
        if let Some(tab) = s.tabs.iter_mut().find(|t| t.id == id) {
            tab.pinned = pinned;
        }
    }

    pub fn set_tab_url(&self, id: TabId, addr: &str) {
        let mut s = self.state.borrow_mut();
        if let Some(tab) = s.tabs.iter_mut().find(|t| t.id == id) {
            tab.url = url(addr);
        }
    }

    pub fn activate(&self, id: TabId) {
        let mut s = self.state.borrow_mut();
        for tab in &mut s.tabs {
            tab.active = tab.id == id;
        }
    }

    pub fn set_scroll(&self, id: TabId, x: i32, y: i32) {
        self.state.borrow_mut().scroll.insert(id, (x, y));
    }

    pub fn set_page_size(&self, w: i32, h: i32) {
        self.state.borrow_mut().page = (w, h);
    }

    pub fn scroll_of(&self, id: TabId) -> (i32, i32) {
        self.state.borrow().scroll.get(&id).copied().unwrap_or((0, 0))
    }

    pub fn active_tab(&self) -> TabId {
        self.state
            .borrow()
            .tabs
            .iter()
            .find(|t| t.active)
            .map(|t| t.id)
            .expect("no active tab")
    }

    pub fn tab_count(&self) -> usize {
        self.state.borrow().tabs.len()
    }

    pub fn removed(&self) -> Vec<TabId> {
        self.state.borrow().removed.clone()
    }

    pub fn created(&self) -> Vec<Url> {
        self.state.borrow().created.clone()
    }

    pub fn windows(&self) -> Vec<Url> {
        self.state.borrow().windows.clone()
    }

    pub fn navigations(&self) -> Vec<(TabId, Url)> {
        self.state.borrow().navigations.clone()
    }

    pub fn reloads(&self) -> Vec<(TabId, bool)> {
        self.state.borrow().reloads.clone()
    }

    pub fn reopened(&self) -> u32 {
        self.state.borrow().reopened
    }

    pub fn history(&self) -> Vec<(TabId, i32)> {
        self.state.borrow().history.clone()
    }

    pub fn console_calls(&self) -> Vec<ConsoleCall> {
        self.state.borrow().console.clone()
    }

    pub fn zoom_of(&self, id: TabId) -> f64 {
        self.state.borrow().zoom.get(&id).copied().unwrap_or(1.0)
    }

    pub fn last_created(&self) -> TabId {
        let s = self.state.borrow();
        s.tabs.last().map(|t| t.id).expect("no tabs")
    }

    fn push_tab(state: &mut State, addr: &Url) -> Tab {
        let id = TabId(state.next_id);
        state.next_id += 1;
        let tab = Tab {
            id,
            index: state.tabs.len(),
            url: addr.clone(),
            title: String::new(),
            active: false,
            pinned: false,
        };
        state.tabs.push(tab.clone());
        state.scroll.insert(id, (0, 0));
        tab
    }
}

impl TabOps for SharedBrowser {
    fn current(&self) -> CapResult<Tab> {
        self.state
            .borrow()
            .tabs
            .iter()
            .find(|t| t.active)
            .cloned()
            .ok_or_else(|| CapabilityError::new("no active tab"))
    }

    fn all(&self) -> CapResult<Vec<Tab>> {
        Ok(self.state.borrow().tabs.clone())
    }

    fn select(&self, id: TabId) -> CapResult<()> {
        let mut s = self.state.borrow_mut();
        if !s.tabs.iter().any(|t| t.id == id) {
            return Err(CapabilityError::new("no such tab"));
        }
        for tab in &mut s.tabs {
            tab.active = tab.id == id;
        }
        Ok(())
    }

    fn remove(&self, ids: &[TabId]) -> CapResult<()> {
        let mut s = self.state.borrow_mut();
        s.tabs.retain(|t| !ids.contains(&t.id));
        for (i, tab) in s.tabs.iter_mut().enumerate() {
            tab.index = i;
        }
        s.removed.extend_from_slice(ids);
        Ok(())
    }

    fn create(&self, addr: &Url) -> CapResult<Tab> {
        let mut s = self.state.borrow_mut();
        s.created.push(addr.clone());
        Ok(FakeBrowser::push_tab(&mut s, addr))
    }

    fn create_window(&self, addr: &Url) -> CapResult<Tab> {
        let mut s = self.state.borrow_mut();
        s.windows.push(addr.clone());
        Ok(FakeBrowser::push_tab(&mut s, addr))
    }

    fn navigate(&self, id: TabId, addr: &Url) -> CapResult<()> {
        let mut s = self.state.borrow_mut();
        s.navigations.push((id, addr.clone()));
        if let Some(tab) = s.tabs.iter_mut().find(|t| t.id == id) {
            tab.url = addr.clone();
        }
        Ok(())
    }

    fn duplicate(&self, id: TabId) -> CapResult<Tab> {
        let addr = {
            let s = self.state.borrow();
            s.tabs
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.url.clone())
                .ok_or_else(|| CapabilityError::new("no such tab"))?
        };
        self.create(&addr)
    }

    fn reload(&self, id: TabId, bypass_cache: bool) -> CapResult<()> {
        self.state.borrow_mut().reloads.push((id, bypass_cache));
        Ok(())
    }

    fn reopen(&self) -> CapResult<()> {
        self.state.borrow_mut().reopened += 1;
        Ok(())
    }

    fn set_pinned(&self, id: TabId, pinned: bool) -> CapResult<()> {
        let mut s = self.state.borrow_mut();
        let tab = s
            .tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CapabilityError::new("no such tab"))?;
        tab.pinned = pinned;
        Ok(())
    }

    fn zoom(&self, id: TabId) -> CapResult<f64> {
        Ok(self.state.borrow().zoom.get(&id).copied().unwrap_or(1.0))
    }

    fn set_zoom(&self, id: TabId, factor: f64) -> CapResult<()> {
        self.state.borrow_mut().zoom.insert(id, factor);
        Ok(())
    }
}

impl ConsoleOps for SharedBrowser {
    fn show_command(&self, tab: TabId, prefill: &str) -> CapResult<()> {
        self.state
            .borrow_mut()
            .console
            .push(ConsoleCall::Command(tab, prefill.to_string()));
        Ok(())
    }

    fn show_find(&self, tab: TabId) -> CapResult<()> {
        self.state.borrow_mut().console.push(ConsoleCall::Find(tab));
        Ok(())
    }

    fn hide(&self, tab: TabId) -> CapResult<()> {
        self.state.borrow_mut().console.push(ConsoleCall::Hide(tab));
        Ok(())
    }
}

impl ContentOps for SharedBrowser {
    fn scroll_to(&self, tab: TabId, x: i32, y: i32) -> CapResult<()> {
        self.state.borrow_mut().scroll.insert(tab, (x, y));
        Ok(())
    }

    fn scroll_position(&self, tab: TabId) -> CapResult<(i32, i32)> {
        Ok(self.state.borrow().scroll.get(&tab).copied().unwrap_or((0, 0)))
    }

    fn viewport_size(&self, _tab: TabId) -> CapResult<(i32, i32)> {
        Ok(self.state.borrow().viewport)
    }

    fn page_size(&self, _tab: TabId) -> CapResult<(i32, i32)> {
        Ok(self.state.borrow().page)
    }

    fn history_go(&self, tab: TabId, delta: i32) -> CapResult<()> {
        self.state.borrow_mut().history.push((tab, delta));
        Ok(())
    }
}
