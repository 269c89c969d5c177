use dashapi::form;

/// One inbound API call, as read from its form body.
///
/// Missing fields read as empty; when a field repeats, its first value wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallEnvelope {
    pub client: String,
    /// Passed by callers but never verified here
    pub key: String,
    pub method: String,
    /// gzip-compressed JSON, `None` when the field is absent
    pub payload: Option<Vec<u8>>,
}

impl CallEnvelope {
    pub fn from_form(body: &[u8]) -> Self {
        let mut envelope = CallEnvelope::default();

        // Walk backwards so earlier values overwrite later ones
        for (name, value) in form::decode(body).into_iter().rev() {
            match name.as_str() {
                "client" => envelope.client = String::from_utf8_lossy(&value).into_owned(),
                "key" => envelope.key = String::from_utf8_lossy(&value).into_owned(),
                "method" => envelope.method = String::from_utf8_lossy(&value).into_owned(),
                "payload" => envelope.payload = Some(value),
                _ => {}
            }
        }

        envelope
    }
}
