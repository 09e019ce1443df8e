use crate::{
    bundle::Bundle,
    error::Result,
    message::Message,
    report::{Extension, StatusReport},
};
use tracing::debug;

/// Rewrites message text and hints through a bundle.
///
/// For each message the text is looked up verbatim, then the hint. A hint
/// (localized or not) fills the first `{}` of the text and is then dropped
/// from the message. Bundle misses leave the original string in place.
pub struct Translator<'a, B: Bundle + ?Sized> {
    bundle: &'a B,
}

impl<'a, B: Bundle + ?Sized> Translator<'a, B> {
    pub fn new(bundle: &'a B) -> Self {
        Self { bundle }
    }

    /// Returns whether the text or the hint hit the bundle.
    pub fn translate_message(&self, message: &mut Message) -> bool {
        let mut hit = false;
        if let Some(localized) = self.bundle.lookup(&message.text) {
            message.text = localized.to_string();
            hit = true;
        }
        if let Some(hint) = message.hint.take() {
            let hint = match self.bundle.lookup(&hint) {
                Some(localized) => {
                    hit = true;
                    localized.to_string()
                }
                None => hint,
            };
            message.text = message.text.replacen("{}", &hint, 1);
        }
        hit
    }

    /// Translates every message of `report` in place. The title is kept.
    pub fn translate<X>(&self, report: &mut StatusReport<X>) {
        let total = report.messages.len();
        let hits = report
            .messages
            .iter_mut()
            .map(|m| self.translate_message(m))
            .filter(|hit| *hit)
            .count();
        debug!("translated status messages hits={hits} total={total}");
    }
}

impl<X> StatusReport<X> {
    pub fn translate<B: Bundle + ?Sized>(&mut self, bundle: &B) {
        Translator::new(bundle).translate(self);
    }
}

/// Decodes `json` and translates it with `bundle`.
pub fn translate_json<X: Extension, B: Bundle + ?Sized>(
    json: &str,
    bundle: &B,
) -> Result<StatusReport<X>> {
    let mut report = StatusReport::<X>::from_json_str(json)?;
    report.translate(bundle);
    Ok(report)
}
