//
// etherpad-client model.rs
// Distributed under terms of the GNU GPLv3 license.
//

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// The response envelope every Etherpad API call returns. The `data` field is
/// kept dynamic here and decoded per operation once the code has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Value
}

/// A single group, as returned by createGroup and createGroupIfNotExistsFor
#[derive(Debug, Deserialize)]
pub struct Group {
    #[serde(rename = "groupID")]
    pub group_id: String
}

/// The group list returned by listAllGroups
#[derive(Debug, Deserialize)]
pub struct Groups {
    #[serde(rename = "groupIDs")]
    pub group_ids: Vec<String>
}

/// A single author
#[derive(Debug, Deserialize)]
pub struct Author {
    #[serde(rename = "authorID")]
    pub author_id: String
}

/// The author list returned by listAuthorsOfPad
#[derive(Debug, Deserialize)]
pub struct Authors {
    #[serde(rename = "authorIDs")]
    pub author_ids: Vec<String>
}

/// A single pad, as returned by createGroupPad, copyPad and getPadID
#[derive(Debug, Deserialize)]
pub struct Pad {
    #[serde(rename = "padID")]
    pub pad_id: String
}

/// A pad list, as returned by listPads, listPadsOfAuthor and listAllPads
#[derive(Debug, Deserialize)]
pub struct Pads {
    #[serde(rename = "padIDs")]
    pub pad_ids: Vec<String>
}

/// A newly created session
#[derive(Debug, Deserialize)]
pub struct Session {
    #[serde(rename = "sessionID")]
    pub session_id: String
}

/// Session details; validUntil is epoch seconds
#[derive(Clone, Debug, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "groupID")]
    pub group_id: String,
    #[serde(rename = "authorID")]
    pub author_id: String,
    #[serde(rename = "validUntil")]
    pub valid_until: i64
}

/// The session maps returned by listSessionsOfGroup and listSessionsOfAuthor
/// are keyed by session ID; deleted sessions may show up as null entries.
pub type Sessions = HashMap<String, Option<SessionInfo>>;

/// Plain text content of a pad. The server always terminates the text with a
/// newline; it is returned verbatim.
#[derive(Debug, Deserialize)]
pub struct PadText {
    pub text: String
}

/// HTML content of a pad
#[derive(Debug, Deserialize)]
pub struct PadHtml {
    pub html: String
}

/// The revision counter returned by getRevisionsCount
#[derive(Debug, Deserialize)]
pub struct RevisionsCount {
    pub revisions: u64
}

/// The saved revision counter returned by getSavedRevisionsCount
#[derive(Debug, Deserialize)]
pub struct SavedRevisionsCount {
    #[serde(rename = "savedRevisions")]
    pub saved_revisions: u64
}

/// The saved revision numbers returned by listSavedRevisions
#[derive(Debug, Deserialize)]
pub struct SavedRevisions {
    #[serde(rename = "savedRevisions")]
    pub saved_revisions: Vec<u64>
}

/// Rendered diff between two revisions
#[derive(Debug, Deserialize)]
pub struct DiffHtml {
    pub html: String,
    #[serde(default)]
    pub authors: Vec<String>
}

/// Number of users currently connected to a pad
#[derive(Debug, Deserialize)]
pub struct PadUsersCount {
    #[serde(rename = "padUsersCount")]
    pub pad_users_count: u64
}

/// A user currently editing a pad. The colorId may be a palette index or a
/// hex string depending on the server version, so it stays dynamic.
#[derive(Clone, Debug, Deserialize)]
pub struct PadUser {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "colorId")]
    pub color_id: Option<Value>,
    pub timestamp: Option<i64>
}

/// The user list returned by padUsers
#[derive(Debug, Deserialize)]
pub struct PadUsers {
    #[serde(rename = "padUsers")]
    pub pad_users: Vec<PadUser>
}

/// The read-only ID of a pad
#[derive(Debug, Deserialize)]
pub struct ReadOnlyId {
    #[serde(rename = "readOnlyID")]
    pub read_only_id: String
}

/// Public flag of a group pad
#[derive(Debug, Deserialize)]
pub struct PublicStatus {
    #[serde(rename = "publicStatus")]
    pub public_status: bool
}

/// Password protection flag of a group pad
#[derive(Debug, Deserialize)]
pub struct PasswordProtection {
    #[serde(rename = "isPasswordProtected")]
    pub is_password_protected: bool
}

/// Last edit timestamp of a pad, epoch milliseconds
#[derive(Debug, Deserialize)]
pub struct LastEdited {
    #[serde(rename = "lastEdited")]
    pub last_edited: i64
}

/// The attribute pool of a pad. Its layout is an internal detail of the
/// server's changeset library, so it is exposed as raw JSON.
#[derive(Debug, Deserialize)]
pub struct AttributePool {
    pub pool: Value
}

/// Index of the latest chat message of a pad
#[derive(Debug, Deserialize)]
pub struct ChatHead {
    #[serde(rename = "chatHead")]
    pub chat_head: i64
}

/// A single chat message
#[derive(Clone, Debug, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub time: i64,
    #[serde(rename = "userName")]
    pub user_name: Option<String>
}

/// A chat history slice returned by getChatHistory
#[derive(Debug, Deserialize)]
pub struct ChatHistory {
    pub messages: Vec<ChatMessage>
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"code":0,"message":"ok","data":{"groupID":"g.uGIQRLEntil3YMPj"}}"#
        ).unwrap();
        assert_eq!(0, envelope.code);
        assert_eq!("ok", envelope.message);
        let group: Group = serde_json::from_value(envelope.data).unwrap();
        assert_eq!("g.uGIQRLEntil3YMPj", group.group_id);
        // data may be absent entirely, in which case it decodes as null
        let envelope: Envelope = serde_json::from_str(r#"{"code":4,"message":"no or wrong API Key"}"#).unwrap();
        assert_eq!(4, envelope.code);
        assert!(envelope.data.is_null());
        // a body without code is a decode failure
        assert!(serde_json::from_str::<Envelope>(r#"{"message":"ok"}"#).is_err());
    }

    #[test]
    fn sessions() {
        let sessions: Sessions = serde_json::from_str(
            r#"{"s.dbb345445216dbd7dd74848107919ace":{"groupID":"g.Mhrfd2ojfVexSjq5","authorID":"a.siYORA4fX3Ppd7uU","validUntil":1542533916},"s.26246bb1255840be181974b5a91b89ca":null}"#
        ).unwrap();
        assert_eq!(2, sessions.len());
        let info = sessions["s.dbb345445216dbd7dd74848107919ace"].as_ref().unwrap();
        assert_eq!("g.Mhrfd2ojfVexSjq5", info.group_id);
        assert_eq!("a.siYORA4fX3Ppd7uU", info.author_id);
        assert_eq!(1542533916, info.valid_until);
        assert!(sessions["s.26246bb1255840be181974b5a91b89ca"].is_none());
    }

    #[test]
    fn chat_history() {
        let history: ChatHistory = serde_json::from_str(
            r#"{"messages":[{"text":"hi from user1","userId":"a.qoQdFoqnyBqSQyjk","time":1542557899346,"userName":"integration-author-1"},{"text":"hi from user2","userId":"a.MKXerRkHJa6UAEOf","time":1542557899,"userName":null}]}"#
        ).unwrap();
        assert_eq!(2, history.messages.len());
        assert_eq!("hi from user1", history.messages[0].text);
        assert_eq!(1542557899346, history.messages[0].time);
        assert_eq!(Some("integration-author-1".to_string()), history.messages[0].user_name);
        assert_eq!(None, history.messages[1].user_name);
    }

    #[test]
    fn attribute_pool() {
        let pool: AttributePool = serde_json::from_str(
            r#"{"pool":{"numToAttrib":{"0":["author",""],"1":["removed","true"]},"attribToNum":{"author,":0,"removed,true":1},"nextNum":2}}"#
        ).unwrap();
        assert!(pool.pool.get("numToAttrib").is_some());
        assert_eq!(2, pool.pool["nextNum"]);
    }

    #[test]
    fn pad_users() {
        let users: PadUsers = serde_json::from_str(
            r##"{"padUsers":[{"colorId":"#c1a9d9","name":"bob","timestamp":1345228793126,"id":"a.n4gEeMLsvg12452n"},{"colorId":12,"name":null,"timestamp":null,"id":"a.mnyw"}]}"##
        ).unwrap();
        assert_eq!(2, users.pad_users.len());
        assert_eq!("a.n4gEeMLsvg12452n", users.pad_users[0].id);
        assert_eq!(Some("bob".to_string()), users.pad_users[0].name);
        assert!(users.pad_users[1].color_id.as_ref().unwrap().is_number());
    }
}
