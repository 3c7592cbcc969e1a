//! Gateway event types
//!
//! Every event name the platform sends in the `t` field of a dispatch frame.

use std::fmt;

macro_rules! event_types {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal; )*) => {
        /// Gateway event types
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum GatewayEventType {
            $( $(#[$doc])* $variant, )*
        }

        impl GatewayEventType {
            /// Every known event type
            pub const ALL: &'static [Self] = &[$( Self::$variant, )*];

            /// Get the wire name of the event type
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Parse an event type from its wire name
            #[must_use]
            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $( $name => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

event_types! {
    // Session events
    /// Identify accepted
    Ready => "READY";
    /// Resume accepted
    Resumed => "RESUMED";

    // Guild events
    GuildCreate => "GUILD_CREATE";
    GuildUpdate => "GUILD_UPDATE";
    GuildDelete => "GUILD_DELETE";

    // Channel events
    ChannelCreate => "CHANNEL_CREATE";
    ChannelUpdate => "CHANNEL_UPDATE";
    ChannelDelete => "CHANNEL_DELETE";

    // Member events
    GuildMemberAdd => "GUILD_MEMBER_ADD";
    GuildMemberUpdate => "GUILD_MEMBER_UPDATE";
    GuildMemberRemove => "GUILD_MEMBER_REMOVE";

    // Message events
    /// Any guild message (private bots)
    MessageCreate => "MESSAGE_CREATE";
    MessageDelete => "MESSAGE_DELETE";
    /// Message that @-mentions the bot
    AtMessageCreate => "AT_MESSAGE_CREATE";
    PublicMessageDelete => "PUBLIC_MESSAGE_DELETE";
    DirectMessageCreate => "DIRECT_MESSAGE_CREATE";
    DirectMessageDelete => "DIRECT_MESSAGE_DELETE";

    // Reaction events
    MessageReactionAdd => "MESSAGE_REACTION_ADD";
    MessageReactionRemove => "MESSAGE_REACTION_REMOVE";

    // Interaction events
    InteractionCreate => "INTERACTION_CREATE";

    // Audit events
    MessageAuditPass => "MESSAGE_AUDIT_PASS";
    MessageAuditReject => "MESSAGE_AUDIT_REJECT";

    // Audio events
    AudioStart => "AUDIO_START";
    AudioFinish => "AUDIO_FINISH";
    AudioOnMic => "AUDIO_ON_MIC";
    AudioOffMic => "AUDIO_OFF_MIC";

    // Forum events
    ForumThreadCreate => "FORUM_THREAD_CREATE";
    ForumThreadUpdate => "FORUM_THREAD_UPDATE";
    ForumThreadDelete => "FORUM_THREAD_DELETE";
    ForumPostCreate => "FORUM_POST_CREATE";
    ForumPostDelete => "FORUM_POST_DELETE";
    ForumReplyCreate => "FORUM_REPLY_CREATE";
    ForumReplyDelete => "FORUM_REPLY_DELETE";
    ForumPublishAuditResult => "FORUM_PUBLISH_AUDIT_RESULT";
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<GatewayEventType> for String {
    fn from(event: GatewayEventType) -> Self {
        event.as_str().to_string()
    }
}
