//! Application state and the auth-gated screen decision.
//!
//! Which screen renders is a pure function of `AuthState`. The check is
//! three-valued: while identity resolution is pending the app shows a
//! loading view, never the dashboard, so a stale token can not flash
//! protected content before the server has answered.

use shared::types::{PublicUser, StatsResponse};

// ---------------------------------------------------------------------------
// Auth state and screens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Identity resolution is still in flight.
    Pending,
    Authenticated(PublicUser),
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Login,
    Dashboard,
}

/// The guard: Pending maps to Loading, never to Dashboard.
pub fn screen_for(auth: &AuthState) -> Screen {
    match auth {
        AuthState::Pending => Screen::Loading,
        AuthState::Unauthenticated => Screen::Login,
        AuthState::Authenticated(_) => Screen::Dashboard,
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    /// Cycle focus forward, skipping Name while in login mode.
    pub fn next(self, mode: Mode) -> Self {
        match (self, mode) {
            (Field::Name, _) => Field::Email,
            (Field::Email, _) => Field::Password,
            (Field::Password, Mode::Register) => Field::Name,
            (Field::Password, Mode::Login) => Field::Email,
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct App {
    pub auth: AuthState,
    pub mode: Mode,
    pub focus: Field,
    pub name: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub in_flight: bool,
    pub stats: Option<StatsResponse>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            auth: AuthState::Pending,
            mode: Mode::Login,
            focus: Field::Email,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            error: None,
            in_flight: false,
            stats: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        screen_for(&self.auth)
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Login => Mode::Register,
            Mode::Register => Mode::Login,
        };
        self.error = None;
        self.focus = match self.mode {
            Mode::Register => Field::Name,
            Mode::Login => Field::Email,
        };
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next(self.mode);
    }

    pub fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    /// A submission may start only when none is already in flight.
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }

    /// Mark a submission as started. Returns false (and does nothing) when
    /// one is already running, so double Enter can not fire twice.
    pub fn begin_submit(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        self.error = None;
        true
    }

    pub fn fail_submit(&mut self, message: String) {
        self.in_flight = false;
        self.error = Some(message);
    }

    /// Startup identity resolution finished: a user means the stored token
    /// was valid, None means login is required.
    pub fn resolve_identity(&mut self, user: Option<PublicUser>) {
        self.auth = match user {
            Some(user) => AuthState::Authenticated(user),
            None => AuthState::Unauthenticated,
        };
    }

    /// A login or registration round-trip succeeded.
    pub fn finish_auth(&mut self, user: PublicUser) {
        self.in_flight = false;
        self.error = None;
        self.password.clear();
        self.auth = AuthState::Authenticated(user);
    }

    pub fn logout(&mut self) {
        self.auth = AuthState::Unauthenticated;
        self.stats = None;
        self.password.clear();
        self.error = None;
        self.in_flight = false;
    }
}
