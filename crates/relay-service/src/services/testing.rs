//! In-memory collaborators for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use relay_core::{
    BanRecord, BanRepository, LocatedPlayer, NewBan, NoteSeverity, PlayerLocator, RepoResult,
    ServerIdentity, SessionEnforcer, UnbanRecord,
};
use uuid::Uuid;

use super::context::{ServiceContext, ServiceContextBuilder};
use super::round::SharedRoundState;
use super::webhook::{PayloadTemplate, WebhookDispatcher};

#[derive(Default)]
pub struct MemoryBans {
    pub bans: Mutex<HashMap<i32, BanRecord>>,
    pub unbans: Mutex<HashMap<i32, UnbanRecord>>,
    pub created: Mutex<Vec<NewBan>>,
    pub lookups: AtomicUsize,
    next_id: AtomicI32,
}

impl MemoryBans {
    pub fn insert(&self, ban: BanRecord) {
        self.bans.lock().insert(ban.id, ban);
    }

    pub fn insert_unban(&self, unban: UnbanRecord) {
        self.unbans.lock().insert(unban.id, unban);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BanRepository for MemoryBans {
    async fn get_ban(&self, ban_id: i32) -> RepoResult<Option<BanRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.bans.lock().get(&ban_id).cloned())
    }

    async fn get_unban(&self, unban_id: i32) -> RepoResult<Option<UnbanRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.unbans.lock().get(&unban_id).cloned())
    }

    async fn create_ban(&self, ban: &NewBan) -> RepoResult<i32> {
        self.created.lock().push(ban.clone());
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[derive(Default)]
pub struct MemoryPlayers(pub Mutex<HashMap<Uuid, LocatedPlayer>>);

#[async_trait]
impl PlayerLocator for MemoryPlayers {
    async fn lookup_id(&self, user_id: Uuid) -> RepoResult<Option<LocatedPlayer>> {
        Ok(self.0.lock().get(&user_id).cloned())
    }
}

pub struct FixedIdentity(pub i32);

#[async_trait]
impl ServerIdentity for FixedIdentity {
    async fn server_id(&self) -> RepoResult<i32> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub struct RecordingEnforcer {
    pub kicks: Mutex<Vec<(i32, String)>>,
}

impl SessionEnforcer for RecordingEnforcer {
    fn kick_matching(&self, ban: &BanRecord, source: &str) -> Vec<Uuid> {
        self.kicks.lock().push((ban.id, source.to_string()));
        Vec::new()
    }
}

pub struct Fixture {
    pub bans: Arc<MemoryBans>,
    pub players: Arc<MemoryPlayers>,
    pub sessions: Arc<RecordingEnforcer>,
    pub ctx: ServiceContext,
}

/// Context for server 1 with no webhook configured
pub fn fixture() -> Fixture {
    let bans = Arc::new(MemoryBans::default());
    let players = Arc::new(MemoryPlayers::default());
    let sessions = Arc::new(RecordingEnforcer::default());
    let round = Arc::new(SharedRoundState::default());

    let webhook = Arc::new(
        WebhookDispatcher::new(players.clone(), round, PayloadTemplate::default()).unwrap(),
    );

    let ctx = ServiceContextBuilder::new()
        .ban_repo(bans.clone())
        .server_identity(Arc::new(FixedIdentity(1)))
        .sessions(sessions.clone())
        .webhook(webhook)
        .build()
        .unwrap();

    Fixture {
        bans,
        players,
        sessions,
        ctx,
    }
}

pub fn ban(id: i32) -> BanRecord {
    BanRecord {
        id,
        round_id: None,
        user_id: Some(Uuid::new_v4()),
        address: None,
        hwid: None,
        banned_at: Utc::now(),
        expires_at: None,
        reason: "griefing".to_string(),
        severity: NoteSeverity::Minor,
        banning_admin: None,
        unban: None,
    }
}
