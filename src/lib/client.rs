//
// etherpad-client client.rs
// Distributed under terms of the GNU GPLv3 license.
//

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, trace};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{Error, Result};
use super::model::{
    AttributePool,
    Author,
    Authors,
    ChatHead,
    ChatHistory,
    DiffHtml,
    Envelope,
    Group,
    Groups,
    LastEdited,
    Pad,
    PadHtml,
    PadText,
    PadUsers,
    PadUsersCount,
    Pads,
    PasswordProtection,
    PublicStatus,
    ReadOnlyId,
    RevisionsCount,
    SavedRevisions,
    SavedRevisionsCount,
    Session,
    SessionInfo,
    Sessions
};

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
);

/// API version used when none is given
pub const DEFAULT_API_VERSION: &str = "1.2.13";

/// Hook invoked around every HTTP round trip. Implementations can time calls
/// or count them; both methods default to no-ops.
pub trait RequestObserver: Send + Sync {
    /// Called right before the request is sent
    fn on_call(&self, _method: &str, _operation: &str) {}
    /// Called once the response body has been read
    fn on_complete(&self, _method: &str, _operation: &str, _elapsed: Duration) {}
}

/// The parameter mapping sent with every call. The API key is always present;
/// the whole map is serialized to a single JSON blob on the wire.
#[derive(Debug)]
struct Params(BTreeMap<&'static str, Value>);

impl Params {
    fn new(api_key: &str) -> Params {
        let mut params = BTreeMap::new();
        params.insert("apikey", Value::from(api_key));
        Params(params)
    }

    fn arg(mut self, key: &'static str, value: impl Into<Value>) -> Params {
        self.0.insert(key, value.into());
        self
    }

    /// Inserts the value only when present. Omission is server-visible, so
    /// absent optional arguments must not be sent as null.
    fn opt(mut self, key: &'static str, value: Option<impl Into<Value>>) -> Params {
        if let Some(value) = value {
            self.0.insert(key, value.into());
        }
        self
    }

    fn encode(&self) -> String {
        // a map of plain JSON values cannot fail to serialize
        serde_json::to_string(&self.0).expect("Params::encode()")
    }
}

/// Client for connecting to an Etherpad-Lite server
#[derive(Clone)]
pub struct Client {
    api_url: Url,
    api_key: String,
    pub client: reqwest::Client,
    observer: Option<Arc<dyn RequestObserver>>
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client").field("api_url", &self.api_url.as_str()).finish()
    }
}

/// Builder interface to Client
///
/// Usage:
/// ```
/// use etherpad_client::Client;
///
/// let url = "http://localhost:9001";
/// let epc = Client::new(url, "api-key").unwrap();
/// ```
impl Client {

    /// Configure the client with the default API version
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Client> {
        Client::with_api_version(url, api_key, DEFAULT_API_VERSION)
    }

    /// Configure the client against a specific API version. Fails fast when
    /// the base URL cannot be parsed.
    pub fn with_api_version(url: impl Into<String>, api_key: impl Into<String>, api_version: impl Into<String>) -> Result<Client> {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        let api_url = Url::parse(&url)?.join(&format!("api/{}/", api_version.into()))?;
        Ok(Client {
            api_url,
            api_key: api_key.into(),
            client: reqwest::Client::builder()
                .connection_verbose(true)
                .user_agent(USER_AGENT)
                // one independent connection per call, no reuse
                .pool_max_idle_per_host(0)
                .build()
                .expect("Client::new()"),
            observer: None
        })
    }

    /// Attaches an observer invoked around every request
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Client {
        self.observer = Some(observer);
        self
    }

    fn params(&self) -> Params {
        Params::new(&self.api_key)
    }

    /// Internal function to perform one HTTP round trip and return the raw
    /// response body. The JSON parameter blob travels in the query string
    /// and is never split into named query parameters; POST requests
    /// additionally carry it as the form body.
    async fn send(&self, method: Method, operation: &str, params: &Params) -> Result<String> {
        let encoded = params.encode();
        let mut url = self.api_url.join(operation)?;
        url.set_query(Some(&encoded));
        trace!("{}: {}", method, url);
        if let Some(observer) = &self.observer {
            observer.on_call(method.as_str(), operation);
        }
        let started = Instant::now();
        let request = if method == Method::POST {
            self.client.post(url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(encoded)
        } else {
            self.client.get(url)
        };
        let body = request.send().await?.error_for_status()?.text().await?;
        if let Some(observer) = &self.observer {
            observer.on_complete(method.as_str(), operation, started.elapsed());
        }
        Ok(body)
    }

    /// Internal function to perform requests for read-only operations
    async fn get(&self, operation: &str, params: &Params) -> Result<String> {
        self.send(Method::GET, operation, params).await
    }

    /// Internal function to perform requests for mutating operations
    async fn post(&self, operation: &str, params: &Params) -> Result<String> {
        self.send(Method::POST, operation, params).await
    }

    /// Unwraps the response envelope and decodes the data field
    fn data<T: DeserializeOwned>(body: &str) -> Result<T> {
        let envelope: Envelope = serde_json::from_str(body)?;
        if envelope.code != 0 {
            return Err(Error::api(envelope.code, envelope.message));
        }
        Ok(serde_json::from_value(envelope.data)?)
    }

    /// Unwraps the response envelope of operations whose data is irrelevant
    fn ok(body: &str) -> Result<()> {
        let envelope: Envelope = serde_json::from_str(body)?;
        if envelope.code != 0 {
            return Err(Error::api(envelope.code, envelope.message));
        }
        Ok(())
    }

    // ----- groups -----

    /// Creates a new group
    pub async fn create_group(&self) -> Result<Group> {
        debug!("Requesting new group");
        Self::data(&self.post("createGroup", &self.params()).await?)
    }

    /// Creates a group for the mapper if none exists yet, otherwise returns
    /// the existing one
    pub async fn create_group_if_not_exists_for(&self, group_mapper: &str) -> Result<Group> {
        let params = self.params().arg("groupMapper", group_mapper);
        Self::data(&self.post("createGroupIfNotExistsFor", &params).await?)
    }

    /// Deletes a group
    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        debug!("Requesting deletion of group {}", group_id);
        let params = self.params().arg("groupID", group_id);
        Self::ok(&self.post("deleteGroup", &params).await?)
    }

    /// Lists the pads of a group
    pub async fn list_pads(&self, group_id: &str) -> Result<Pads> {
        let params = self.params().arg("groupID", group_id);
        Self::data(&self.get("listPads", &params).await?)
    }

    /// Creates a pad in a group, optionally with initial text
    pub async fn create_group_pad(&self, group_id: &str, pad_name: &str, text: Option<&str>) -> Result<Pad> {
        let params = self.params()
            .arg("groupID", group_id)
            .arg("padName", pad_name)
            .opt("text", text);
        Self::data(&self.post("createGroupPad", &params).await?)
    }

    /// Lists all groups known to the server
    pub async fn list_all_groups(&self) -> Result<Groups> {
        Self::data(&self.get("listAllGroups", &self.params()).await?)
    }

    // ----- authors -----

    /// Creates a new author. The display name is optional and omitted from
    /// the request when not given.
    pub async fn create_author(&self, name: Option<&str>) -> Result<Author> {
        debug!("Requesting new author");
        let params = self.params().opt("name", name);
        Self::data(&self.post("createAuthor", &params).await?)
    }

    /// Creates an author for the mapper if none exists yet, otherwise
    /// returns the existing one
    pub async fn create_author_if_not_exists_for(&self, author_mapper: &str, name: Option<&str>) -> Result<Author> {
        let params = self.params()
            .arg("authorMapper", author_mapper)
            .opt("name", name);
        Self::data(&self.post("createAuthorIfNotExistsFor", &params).await?)
    }

    /// Lists the pads an author has contributed to
    pub async fn list_pads_of_author(&self, author_id: &str) -> Result<Pads> {
        let params = self.params().arg("authorID", author_id);
        Self::data(&self.get("listPadsOfAuthor", &params).await?)
    }

    /// Gets the display name of an author
    pub async fn get_author_name(&self, author_id: &str) -> Result<String> {
        let params = self.params().arg("authorID", author_id);
        Self::data(&self.get("getAuthorName", &params).await?)
    }

    // ----- sessions -----

    async fn create_session_valid_until(&self, group_id: &str, author_id: &str, valid_until: i64) -> Result<Session> {
        // validUntil goes over the wire as an epoch-seconds string
        let params = self.params()
            .arg("groupID", group_id)
            .arg("authorID", author_id)
            .arg("validUntil", valid_until.to_string());
        Self::data(&self.post("createSession", &params).await?)
    }

    /// Creates a session between a group and an author, valid for the given
    /// number of hours from now
    pub async fn create_session_with_duration(&self, group_id: &str, author_id: &str, hours: u32) -> Result<Session> {
        debug!("Requesting session valid for {} hours", hours);
        self.create_session_valid_until(group_id, author_id, hours_from_now(hours)).await
    }

    /// Creates a session between a group and an author, valid until the
    /// given instant
    pub async fn create_session_until(&self, group_id: &str, author_id: &str, valid_until: DateTime<Utc>) -> Result<Session> {
        self.create_session_valid_until(group_id, author_id, valid_until.timestamp()).await
    }

    /// Gets the group, author and expiry of a session
    pub async fn get_session_info(&self, session_id: &str) -> Result<SessionInfo> {
        let params = self.params().arg("sessionID", session_id);
        Self::data(&self.get("getSessionInfo", &params).await?)
    }

    /// Lists the sessions of a group, keyed by session ID
    pub async fn list_sessions_of_group(&self, group_id: &str) -> Result<Sessions> {
        let params = self.params().arg("groupID", group_id);
        Self::data(&self.get("listSessionsOfGroup", &params).await?)
    }

    /// Lists the sessions of an author, keyed by session ID
    pub async fn list_sessions_of_author(&self, author_id: &str) -> Result<Sessions> {
        let params = self.params().arg("authorID", author_id);
        Self::data(&self.get("listSessionsOfAuthor", &params).await?)
    }

    /// Deletes a session
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        debug!("Requesting deletion of session {}", session_id);
        let params = self.params().arg("sessionID", session_id);
        Self::ok(&self.post("deleteSession", &params).await?)
    }

    // ----- pad content -----

    /// Creates a new pad, optionally with initial text
    pub async fn create_pad(&self, pad_id: &str, text: Option<&str>) -> Result<()> {
        debug!("Requesting new pad {}", pad_id);
        let params = self.params()
            .arg("padID", pad_id)
            .opt("text", text);
        Self::ok(&self.post("createPad", &params).await?)
    }

    /// Gets the text of a pad, at a specific revision when given. The server
    /// terminates the text with a newline which is returned untouched.
    pub async fn get_text(&self, pad_id: &str, rev: Option<u64>) -> Result<PadText> {
        let params = self.params()
            .arg("padID", pad_id)
            .opt("rev", rev.map(|rev| rev.to_string()));
        Self::data(&self.get("getText", &params).await?)
    }

    /// Sets the text of a pad
    pub async fn set_text(&self, pad_id: &str, text: &str) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("text", text);
        Self::ok(&self.post("setText", &params).await?)
    }

    /// Appends text to a pad
    pub async fn append_text(&self, pad_id: &str, text: &str) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("text", text);
        Self::ok(&self.post("appendText", &params).await?)
    }

    /// Gets the HTML of a pad, at a specific revision when given
    pub async fn get_html(&self, pad_id: &str, rev: Option<u64>) -> Result<PadHtml> {
        let params = self.params()
            .arg("padID", pad_id)
            .opt("rev", rev.map(|rev| rev.to_string()));
        Self::data(&self.get("getHTML", &params).await?)
    }

    /// Sets the HTML of a pad
    pub async fn set_html(&self, pad_id: &str, html: &str) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("html", html);
        Self::ok(&self.post("setHTML", &params).await?)
    }

    /// Copies a pad including its history and chat. With force the
    /// destination is overwritten when it already exists.
    pub async fn copy_pad(&self, source_id: &str, destination_id: &str, force: Option<bool>) -> Result<Pad> {
        debug!("Requesting copy of pad {} to {}", source_id, destination_id);
        let params = self.params()
            .arg("sourceID", source_id)
            .arg("destinationID", destination_id)
            .opt("force", force);
        Self::data(&self.post("copyPad", &params).await?)
    }

    /// Moves a pad. With force the destination is overwritten when it
    /// already exists.
    pub async fn move_pad(&self, source_id: &str, destination_id: &str, force: Option<bool>) -> Result<()> {
        debug!("Requesting move of pad {} to {}", source_id, destination_id);
        let params = self.params()
            .arg("sourceID", source_id)
            .arg("destinationID", destination_id)
            .opt("force", force);
        Self::ok(&self.post("movePad", &params).await?)
    }

    /// Deletes a pad
    pub async fn delete_pad(&self, pad_id: &str) -> Result<()> {
        debug!("Requesting deletion of pad {}", pad_id);
        let params = self.params().arg("padID", pad_id);
        Self::ok(&self.post("deletePad", &params).await?)
    }

    /// Lists all pads on the server
    pub async fn list_all_pads(&self) -> Result<Pads> {
        Self::data(&self.get("listAllPads", &self.params()).await?)
    }

    /// Checks whether a pad exists. The API has no dedicated call for this,
    /// so the revision counter is probed and an unknown-pad error maps to
    /// false.
    pub async fn pad_exists(&self, pad_id: &str) -> Result<bool> {
        match self.get_revisions_count(pad_id).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_invalid_parameters() => Ok(false),
            Err(error) => Err(error)
        }
    }

    // ----- pad history -----

    /// Gets the number of revisions of a pad
    pub async fn get_revisions_count(&self, pad_id: &str) -> Result<RevisionsCount> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getRevisionsCount", &params).await?)
    }

    /// Gets the changeset of a revision, or of the latest one when no
    /// revision is given
    pub async fn get_revision_changeset(&self, pad_id: &str, rev: Option<u64>) -> Result<String> {
        let params = self.params()
            .arg("padID", pad_id)
            .opt("rev", rev.map(|rev| rev.to_string()));
        Self::data(&self.get("getRevisionChangeset", &params).await?)
    }

    /// Renders the difference between two revisions as HTML
    pub async fn create_diff_html(&self, pad_id: &str, start_rev: u64, end_rev: u64) -> Result<DiffHtml> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("startRev", start_rev.to_string())
            .arg("endRev", end_rev.to_string());
        Self::data(&self.get("createDiffHTML", &params).await?)
    }

    /// Marks a revision as saved, the current one when none is given
    pub async fn save_revision(&self, pad_id: &str, rev: Option<u64>) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .opt("rev", rev.map(|rev| rev.to_string()));
        Self::ok(&self.post("saveRevision", &params).await?)
    }

    /// Gets the number of saved revisions of a pad
    pub async fn get_saved_revisions_count(&self, pad_id: &str) -> Result<SavedRevisionsCount> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getSavedRevisionsCount", &params).await?)
    }

    /// Lists the saved revision numbers of a pad
    pub async fn list_saved_revisions(&self, pad_id: &str) -> Result<SavedRevisions> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("listSavedRevisions", &params).await?)
    }

    // ----- pad metadata -----

    /// Sets the public flag of a group pad
    pub async fn set_public_status(&self, pad_id: &str, public_status: bool) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("publicStatus", public_status);
        Self::ok(&self.post("setPublicStatus", &params).await?)
    }

    /// Gets the public flag of a group pad
    pub async fn get_public_status(&self, pad_id: &str) -> Result<PublicStatus> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getPublicStatus", &params).await?)
    }

    /// Protects a group pad with a password
    pub async fn set_password(&self, pad_id: &str, password: &str) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("password", password);
        Self::ok(&self.post("setPassword", &params).await?)
    }

    /// Checks whether a group pad is password protected
    pub async fn is_password_protected(&self, pad_id: &str) -> Result<PasswordProtection> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("isPasswordProtected", &params).await?)
    }

    /// Gets the number of users currently editing a pad
    pub async fn pad_users_count(&self, pad_id: &str) -> Result<PadUsersCount> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("padUsersCount", &params).await?)
    }

    /// Lists the users currently editing a pad
    pub async fn pad_users(&self, pad_id: &str) -> Result<PadUsers> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("padUsers", &params).await?)
    }

    /// Gets the read-only ID of a pad
    pub async fn get_read_only_id(&self, pad_id: &str) -> Result<ReadOnlyId> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getReadOnlyID", &params).await?)
    }

    /// Resolves a read-only ID back to the pad ID
    pub async fn get_pad_id(&self, read_only_id: &str) -> Result<Pad> {
        let params = self.params().arg("roID", read_only_id);
        Self::data(&self.get("getPadID", &params).await?)
    }

    /// Lists the authors that have contributed to a pad
    pub async fn list_authors_of_pad(&self, pad_id: &str) -> Result<Authors> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("listAuthorsOfPad", &params).await?)
    }

    /// Gets the last edit timestamp of a pad, epoch milliseconds
    pub async fn get_last_edited(&self, pad_id: &str) -> Result<LastEdited> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getLastEdited", &params).await?)
    }

    /// Gets the attribute pool of a pad
    pub async fn get_attribute_pool(&self, pad_id: &str) -> Result<AttributePool> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getAttributePool", &params).await?)
    }

    /// Broadcasts an out-of-band message to the clients of a pad
    pub async fn send_clients_message(&self, pad_id: &str, msg: &str) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("msg", msg);
        Self::ok(&self.post("sendClientsMessage", &params).await?)
    }

    // ----- chat -----

    /// Appends a chat message to a pad, with an optional epoch-seconds
    /// timestamp
    pub async fn append_chat_message(&self, pad_id: &str, text: &str, author_id: &str, time: Option<i64>) -> Result<()> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("text", text)
            .arg("authorID", author_id)
            .opt("time", time.map(|time| time.to_string()));
        Self::ok(&self.post("appendChatMessage", &params).await?)
    }

    /// Gets the index of the latest chat message of a pad
    pub async fn get_chat_head(&self, pad_id: &str) -> Result<ChatHead> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getChatHead", &params).await?)
    }

    /// Gets the whole chat history of a pad
    pub async fn get_chat_history(&self, pad_id: &str) -> Result<ChatHistory> {
        let params = self.params().arg("padID", pad_id);
        Self::data(&self.get("getChatHistory", &params).await?)
    }

    /// Gets the chat messages between two indexes, both inclusive
    pub async fn get_chat_history_range(&self, pad_id: &str, start: u64, end: u64) -> Result<ChatHistory> {
        let params = self.params()
            .arg("padID", pad_id)
            .arg("start", start.to_string())
            .arg("end", end.to_string());
        Self::data(&self.get("getChatHistory", &params).await?)
    }

    // ----- misc -----

    /// Checks that the configured API key is accepted by the server
    pub async fn check_token(&self) -> Result<()> {
        debug!("Checking API key");
        Self::ok(&self.get("checkToken", &self.params()).await?)
    }
}

fn hours_from_now(hours: u32) -> i64 {
    Utc::now().timestamp() + i64::from(hours) * 3600
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use mockito::{Matcher, Server};

    const JH: (&str, &str) = ("content-type", "application/json");
    const KEY: &str = "secret-key";

    fn client(url: &str) -> Client {
        Client::new(url, KEY).unwrap()
    }

    #[test]
    fn params_always_contain_api_key() {
        assert_eq!(r#"{"apikey":"secret-key"}"#, Params::new(KEY).encode());
        let params = Params::new(KEY).arg("padID", "a-pad");
        assert_eq!(r#"{"apikey":"secret-key","padID":"a-pad"}"#, params.encode());
    }

    #[test]
    fn optional_arguments_are_omitted_not_nulled() {
        let without = Params::new(KEY).opt("name", None::<&str>);
        assert_eq!(r#"{"apikey":"secret-key"}"#, without.encode());
        let with = Params::new(KEY).opt("name", Some("alice"));
        assert_eq!(r#"{"apikey":"secret-key","name":"alice"}"#, with.encode());
    }

    #[test]
    fn numbers_travel_as_strings_and_flags_as_booleans() {
        let params = Params::new(KEY)
            .arg("padID", "a-pad")
            .opt("rev", Some(2u64.to_string()));
        assert_eq!(r#"{"apikey":"secret-key","padID":"a-pad","rev":"2"}"#, params.encode());
        let params = Params::new(KEY)
            .arg("sourceID", "a")
            .arg("destinationID", "b")
            .arg("force", true);
        assert_eq!(r#"{"apikey":"secret-key","destinationID":"b","force":true,"sourceID":"a"}"#, params.encode());
    }

    #[test]
    fn api_url_construction() {
        let client = client("http://localhost:9001");
        assert_eq!("http://localhost:9001/api/1.2.13/", client.api_url.as_str());
        let client = Client::with_api_version("http://example.com/etherpad", KEY, "1.2.7").unwrap();
        assert_eq!("http://example.com/etherpad/api/1.2.7/", client.api_url.as_str());
        let error = Client::new("not an url", KEY).unwrap_err();
        assert!(error.is_url_parse());
    }

    #[test]
    fn session_expiry_from_duration() {
        let expected = Utc::now().timestamp() + 8 * 3600;
        let valid_until = hours_from_now(8);
        assert!((valid_until - expected).abs() <= 5);
    }

    #[tokio::test]
    async fn create_group() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("POST", "/api/1.2.13/createGroup")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .match_body(Matcher::JsonString(r#"{"apikey": "secret-key"}"#.to_string()))
            .with_body(r#"{"code":0,"message":"ok","data":{"groupID":"g.uGIQRLEntil3YMPj"}}"#)
            .create_async()
            .await;
        // Ok response
        let group = client.create_group().await.unwrap();
        assert_eq!("g.uGIQRLEntil3YMPj", group.group_id);
        // A GET to the same operation is not served, the method table is fixed
        let error = client.list_all_groups().await.unwrap_err();
        assert_eq!(Some(501), error.status());
    }

    #[tokio::test]
    async fn create_author_with_and_without_name() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("POST", "/api/1.2.13/createAuthor")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .match_body(Matcher::JsonString(r#"{"apikey": "secret-key"}"#.to_string()))
            .with_body(r#"{"code":0,"message":"ok","data":{"authorID":"a.qGh5EutnGTyacAJV"}}"#)
            .create_async()
            .await;
        let _m = server.mock("POST", "/api/1.2.13/createAuthor")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .match_body(Matcher::JsonString(r#"{"apikey": "secret-key", "name": "integration-author"}"#.to_string()))
            .with_body(r#"{"code":0,"message":"ok","data":{"authorID":"a.5GoZWP87e5g4uRdi"}}"#)
            .create_async()
            .await;
        // The name changes the transmitted parameter set
        let author = client.create_author(None).await.unwrap();
        assert_eq!("a.qGh5EutnGTyacAJV", author.author_id);
        let author = client.create_author(Some("integration-author")).await.unwrap();
        assert_eq!("a.5GoZWP87e5g4uRdi", author.author_id);
    }

    #[tokio::test]
    async fn api_key_is_sent_in_the_query_string() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("GET", "/api/1.2.13/listAllGroups")
            .match_query(Matcher::Regex("apikey".to_string()))
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"code":0,"message":"ok","data":{"groupIDs":["g.6h2V5bBb38lBDco7"]}}"#)
            .create_async()
            .await;
        let groups = client.list_all_groups().await.unwrap();
        assert_eq!(vec!["g.6h2V5bBb38lBDco7".to_string()], groups.group_ids);
    }

    #[tokio::test]
    async fn session_with_explicit_expiry_transmits_exact_epoch_seconds() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let request_body = r#"{"apikey": "secret-key", "groupID": "g.Mhrfd2ojfVexSjq5", "authorID": "a.siYORA4fX3Ppd7uU", "validUntil": "1893456000"}"#;
        let _m = server.mock("POST", "/api/1.2.13/createSession")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .match_body(Matcher::JsonString(request_body.to_string()))
            .with_body(r#"{"code":0,"message":"ok","data":{"sessionID":"s.dbb345445216dbd7dd74848107919ace"}}"#)
            .create_async()
            .await;
        let valid_until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let session = client.create_session_until("g.Mhrfd2ojfVexSjq5", "a.siYORA4fX3Ppd7uU", valid_until).await.unwrap();
        assert_eq!("s.dbb345445216dbd7dd74848107919ace", session.session_id);
    }

    #[tokio::test]
    async fn null_data_unwraps_to_unit() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("POST", "/api/1.2.13/deletePad")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .match_body(Matcher::JsonString(r#"{"apikey": "secret-key", "padID": "a-pad"}"#.to_string()))
            .with_body(r#"{"code":0,"message":"ok","data":null}"#)
            .create_async()
            .await;
        client.delete_pad("a-pad").await.unwrap();
    }

    #[tokio::test]
    async fn scalar_data_is_returned_as_is() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("GET", "/api/1.2.13/getAuthorName")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"code":0,"message":"ok","data":"integration-author"}"#)
            .create_async()
            .await;
        let _m = server.mock("GET", "/api/1.2.13/getRevisionChangeset")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"code":0,"message":"ok","data":"Z:1>5|1+5$text\n"}"#)
            .create_async()
            .await;
        let name = client.get_author_name("a.5GoZWP87e5g4uRdi").await.unwrap();
        assert_eq!("integration-author", name);
        let changeset = client.get_revision_changeset("a-pad", None).await.unwrap();
        assert_eq!("Z:1>5|1+5$text\n", changeset);
    }

    #[tokio::test]
    async fn nonzero_codes_map_to_typed_errors() {
        let cases = [
            (1, "padID does not exist"),
            (2, "an internal error has occurred"),
            (3, "no such function"),
            (4, "no or wrong API Key"),
            (42, "something unexpected")
        ];
        for (code, message) in cases {
            let mut server = Server::new_async().await;
            let client = client(&server.url());
            let _m = server.mock("GET", "/api/1.2.13/getRevisionsCount")
                .match_query(Matcher::Any)
                .with_status(200)
                .with_header(JH.0, JH.1)
                .with_body(format!(r#"{{"code":{code},"message":"{message}","data":null}}"#))
                .create_async()
                .await;
            let error = client.get_revisions_count("a-pad").await.unwrap_err();
            assert!(error.is_api());
            assert_eq!(Some(code), error.code());
            assert_eq!(message, error.message());
            match code {
                1 => assert!(error.is_invalid_parameters()),
                2 => assert!(error.is_internal_error()),
                3 => assert!(error.is_not_supported()),
                4 => assert!(error.is_auth_failure()),
                _ => assert!(!error.is_invalid_parameters())
            }
        }
    }

    #[tokio::test]
    async fn unparseable_body_is_a_json_error() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("GET", "/api/1.2.13/listAllPads")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body("unexpected")
            .create_async()
            .await;
        let error = client.list_all_pads().await.unwrap_err();
        assert!(error.is_json());
        // so is a body without the code field
        let _m = server.mock("GET", "/api/1.2.13/listAllGroups")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"message":"ok","data":null}"#)
            .create_async()
            .await;
        let error = client.list_all_groups().await.unwrap_err();
        assert!(error.is_json());
    }

    #[tokio::test]
    async fn pad_exists_probes_the_revision_counter() {
        let mut server = Server::new_async().await;
        let client = client(&server.url());
        let _m = server.mock("GET", "/api/1.2.13/getRevisionsCount")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"code":1,"message":"padID does not exist","data":null}"#)
            .create_async()
            .await;
        assert!(!client.pad_exists("no-such-pad").await.unwrap());
        let mut server = Server::new_async().await;
        let client = self::client(&server.url());
        let _m = server.mock("GET", "/api/1.2.13/getRevisionsCount")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"code":0,"message":"ok","data":{"revisions":3}}"#)
            .create_async()
            .await;
        assert!(client.pad_exists("a-pad").await.unwrap());
    }

    struct CountingObserver {
        calls: AtomicUsize,
        completions: AtomicUsize
    }

    impl RequestObserver for CountingObserver {
        fn on_call(&self, _method: &str, _operation: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        fn on_complete(&self, _method: &str, _operation: &str, _elapsed: Duration) {
            self.completions.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn observer_wraps_every_round_trip() {
        let mut server = Server::new_async().await;
        let observer = Arc::new(CountingObserver {
            calls: AtomicUsize::new(0),
            completions: AtomicUsize::new(0)
        });
        let client = client(&server.url()).with_observer(observer.clone());
        let _m = server.mock("GET", "/api/1.2.13/checkToken")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header(JH.0, JH.1)
            .with_body(r#"{"code":0,"message":"ok","data":null}"#)
            .create_async()
            .await;
        client.check_token().await.unwrap();
        client.check_token().await.unwrap();
        assert_eq!(2, observer.calls.load(Ordering::SeqCst));
        assert_eq!(2, observer.completions.load(Ordering::SeqCst));
    }
}
