use model::{
    api::SaveMapPosition,
    map_position::MapPosition,
    session::{self, SessionHash},
    LngLat,
};

use crate::{
    api::MarkerApi,
    ui::{Clipboard, Notifier, UrlState},
};

const NEW_HASH_QUESTION: &str = "A new session hash starts an empty map. The markers and map \
    position of the current session stay stored under the old hash. Continue?";

/// Owns the session hash of the page and keeps it in step with the address bar.
pub struct SessionManager<A, U, N>
where
    A: MarkerApi,
    U: UrlState,
    N: Notifier,
{
    api: A,
    url: U,
    notifier: N,
    session_hash: Option<SessionHash>,
    /// What the user typed into the session field. Adopted by
    /// [`Self::update_session_hash`].
    pub temp_session_hash: String,
}

impl<A, U, N> SessionManager<A, U, N>
where
    A: MarkerApi,
    U: UrlState,
    N: Notifier,
{
    pub fn new(api: A, url: U, notifier: N) -> Self {
        Self {
            api,
            url,
            notifier,
            session_hash: None,
            temp_session_hash: String::new(),
        }
    }

    pub fn is_valid_session_hash(hash: &str) -> bool {
        session::is_valid_session_hash(hash)
    }

    pub fn session_hash(&self) -> Option<&SessionHash> {
        self.session_hash.as_ref()
    }

    fn adopt(&mut self, session_hash: SessionHash) {
        self.temp_session_hash = session_hash.to_string();
        self.session_hash = Some(session_hash);
    }

    async fn mint(&mut self) -> Option<SessionHash> {
        match self.api.generate_session_hash().await {
            Ok(session_hash) => {
                log::info!("started session {:?}", session_hash);
                self.url.replace_session_hash(&session_hash);
                self.adopt(session_hash.clone());
                Some(session_hash)
            }
            Err(why) => {
                log::error!("failed to generate session hash: {}", why);
                self.notifier
                    .alert(&format!("Could not generate session hash: {}", why));
                None
            }
        }
    }

    /// Takes the session from the address bar, or starts a new one when the
    /// address carries none or a malformed one. Returns the map position saved
    /// for the session, if any.
    pub async fn ensure_session_hash_and_map_position(&mut self) -> Option<MapPosition> {
        let from_url = self
            .url
            .session_hash()
            .and_then(|hash| SessionHash::parse(hash).ok());
        let session_hash = match from_url {
            Some(session_hash) => {
                self.adopt(session_hash.clone());
                session_hash
            }
            None => self.mint().await?,
        };

        match self.api.list_markers(&session_hash).await {
            Ok(list) => list.map_position,
            Err(why) => {
                log::error!("failed to load map position: {}", why);
                None
            }
        }
    }

    /// Switches to the hash in [`Self::temp_session_hash`] if it differs from
    /// the current one. A malformed hash is refused and the field reset.
    pub async fn update_session_hash(&mut self) -> Option<MapPosition> {
        let current = self
            .session_hash
            .as_ref()
            .map(SessionHash::to_string)
            .unwrap_or_default();
        if self.temp_session_hash.is_empty() || self.temp_session_hash == current {
            return None;
        }
        match SessionHash::parse(self.temp_session_hash.as_str()) {
            Ok(session_hash) => {
                self.url.replace_session_hash(&session_hash);
                self.ensure_session_hash_and_map_position().await
            }
            Err(_) => {
                self.notifier.alert("Please enter a valid session hash.");
                self.temp_session_hash = current;
                None
            }
        }
    }

    /// Starts over with a fresh session once the user agreed to. Markers of
    /// the old session are left alone.
    pub async fn generate_new_hash(&mut self) -> Option<SessionHash> {
        if !self.notifier.confirm(NEW_HASH_QUESTION) {
            return None;
        }
        self.mint().await
    }

    /// The page origin with the session attached. Session hashes are
    /// base64url, so the value needs no escaping.
    pub fn session_url(&self) -> Option<String> {
        let session_hash = self.session_hash.as_ref()?;
        let origin = self.url.origin();
        Some(format!(
            "{}?session_hash={}",
            origin.trim_end_matches('/'),
            session_hash
        ))
    }

    /// Copies a link that opens the current session.
    pub async fn copy_session_url<C: Clipboard>(&self, clipboard: &mut C) -> bool {
        let Some(url) = self.session_url() else {
            self.notifier.alert("Could not copy URL: no session");
            return false;
        };
        match clipboard.write_text(&url).await {
            Ok(()) => true,
            Err(why) => {
                log::error!("failed to copy session url: {}", why);
                self.notifier.alert(&format!("Could not copy URL: {}", why));
                false
            }
        }
    }

    pub async fn save_map_position(&self, center: LngLat, zoom_level: f64) -> bool {
        let Some(session_hash) = &self.session_hash else {
            return false;
        };
        let position = SaveMapPosition {
            session_hash: session_hash.to_string(),
            center_longitude: center.lng,
            center_latitude: center.lat,
            zoom_level,
        };
        match self.api.save_map_position(position).await {
            Ok(_) => true,
            Err(why) => {
                log::error!("failed to save map position: {}", why);
                self.notifier
                    .alert(&format!("Could not save map position: {}", why));
                false
            }
        }
    }
}
