pub fn wrap_twiml(twiml: String) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>{twiml}")
}

mod twiml {
    use xmlserde_derives::XmlSerialize;

    #[derive(PartialEq, Eq, XmlSerialize)]
    #[xmlserde(root = b"Response")]
    pub struct Response {
        #[xmlserde(ty = "untag")]
        pub actions: Vec<ResponseAction>,
    }

    #[derive(PartialEq, Eq, XmlSerialize)]
    pub enum ResponseAction {
        #[xmlserde(name = b"Message")]
        Message(MessageAction),
    }

    #[derive(PartialEq, Eq, XmlSerialize)]
    pub struct MessageAction {
        #[xmlserde(name = b"Body", ty = "child")]
        pub body: MessageBody,
    }

    #[derive(PartialEq, Eq, XmlSerialize, Default)]
    pub struct MessageBody {
        #[xmlserde(ty = "text")]
        pub text: String,
    }

    /// TwiML envelope for a single reply message.
    pub fn message_response(reply: String) -> Response {
        Response {
            actions: vec![ResponseAction::Message(MessageAction {
                body: MessageBody { text: reply },
            })],
        }
    }
}
pub use twiml::*;

mod webhook {
    use serde::Deserialize;

    fn default_num_media() -> String {
        "0".to_string()
    }

    /// Form fields we consume from a Twilio messaging webhook.  Only media
    /// index 0 is ever read, even when `NumMedia` reports more.
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "PascalCase")]
    pub struct TwilioWebhookPayload {
        pub body: String,
        #[serde(default = "default_num_media")]
        pub num_media: String,
        pub media_url0: Option<String>,
        pub media_content_type0: Option<String>,
    }
}
pub use webhook::*;
