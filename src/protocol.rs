// ABOUTME: Decodes the UTF-8 text sub-protocol carried by type-0/1 frames
// ABOUTME: Matches the first ':'-delimited token against the command table

/// One decoded client-to-server command (§4.4's command table). Unknown
/// commands decode to `Unknown` rather than an error — the dispatcher
/// drops them silently, per §4.4 and §7.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SetName(String),
    GetUsers,
    ReqChat { target: String },
    AcceptChat { requester: String },
    DenyChat { requester: String },
    StopChat { target: String },
    /// `text` is everything after the second `:`, so it may itself
    /// contain `:` characters.
    Chat { target: String, text: String },
    ReqSendFiles { target: String, count: String },
    AcceptSendFiles { sender: String },
    DenySendFiles { sender: String },
    FilesReceived { sender: String },
    /// Malformed arguments to an otherwise-recognized command (e.g. `CHAT:`
    /// with no second `:`). Distinct from `Unknown` so the dispatcher can
    /// reply with a protocol-error frame instead of dropping silently.
    Malformed,
    Unknown,
}

impl Command {
    /// Parses one command out of a decoded UTF-8 frame payload.
    pub fn parse(raw: &str) -> Command {
        if let Some(arg) = raw.strip_prefix("SET_NAME:") {
            return Command::SetName(arg.to_string());
        }
        if raw.starts_with("GET_USERS") {
            return Command::GetUsers;
        }
        if let Some(arg) = raw.strip_prefix("REQ_CHAT:") {
            return Command::ReqChat { target: arg.to_string() };
        }
        if let Some(arg) = raw.strip_prefix("ACCEPT_CHAT:") {
            return Command::AcceptChat { requester: arg.to_string() };
        }
        if let Some(arg) = raw.strip_prefix("DENY_CHAT:") {
            return Command::DenyChat { requester: arg.to_string() };
        }
        if let Some(arg) = raw.strip_prefix("STOP_CHAT:") {
            return Command::StopChat { target: arg.to_string() };
        }
        if raw.starts_with("CHAT:") {
            let mut parts = raw.splitn(3, ':');
            parts.next(); // "CHAT"
            return match (parts.next(), parts.next()) {
                (Some(target), Some(text)) => Command::Chat {
                    target: target.to_string(),
                    text: text.to_string(),
                },
                _ => Command::Malformed,
            };
        }
        if let Some(arg) = raw.strip_prefix("REQ_SEND_FILES:") {
            return match arg.split_once(':') {
                Some((target, count)) => Command::ReqSendFiles {
                    target: target.to_string(),
                    count: count.to_string(),
                },
                None => Command::Malformed,
            };
        }
        if let Some(arg) = raw.strip_prefix("ACCEPT_SEND_FILES:") {
            return Command::AcceptSendFiles { sender: arg.to_string() };
        }
        if let Some(arg) = raw.strip_prefix("DENY_SEND_FILES:") {
            return Command::DenySendFiles { sender: arg.to_string() };
        }
        if let Some(arg) = raw.strip_prefix("FILES_RECEIVED:") {
            return Command::FilesReceived { sender: arg.to_string() };
        }
        Command::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_name() {
        assert_eq!(Command::parse("SET_NAME:alice"), Command::SetName("alice".to_string()));
    }

    #[test]
    fn parses_get_users_without_trailing_colon() {
        assert_eq!(Command::parse("GET_USERS"), Command::GetUsers);
    }

    #[test]
    fn chat_text_may_contain_colons() {
        assert_eq!(
            Command::parse("CHAT:bob:10:30 meet me there"),
            Command::Chat {
                target: "bob".to_string(),
                text: "10:30 meet me there".to_string(),
            }
        );
    }

    #[test]
    fn chat_missing_text_is_malformed() {
        assert_eq!(Command::parse("CHAT:bob"), Command::Malformed);
    }

    #[test]
    fn parses_req_send_files_with_count() {
        assert_eq!(
            Command::parse("REQ_SEND_FILES:bob:2"),
            Command::ReqSendFiles {
                target: "bob".to_string(),
                count: "2".to_string(),
            }
        );
    }

    #[test]
    fn unrecognized_command_is_unknown() {
        assert_eq!(Command::parse("PING"), Command::Unknown);
    }
}
