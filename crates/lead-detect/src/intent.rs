//! Intent classification.

use chat_core::Intent;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

// =============================================================================
// INTENT RULES - evaluated in order, first match wins
// =============================================================================

// A greeting only counts when the whole message is a greeting; "hola, busco
// un colchón" falls through to the product rule.
static INTENT_RULES: Lazy<Vec<(Regex, Intent)>> = Lazy::new(|| vec![
    (Regex::new(r"(?i)^[\s¡!]*(?:hola|buen[oa]s(?:\s+(?:d[ií]as|tardes|noches))?|buen\s+d[ií]a|hey|saludos)(?:[\s,.!¡?¿]+(?:qu[eé]\s+tal|c[oó]mo\s+(?:est[aá]s|and[aá]s|va)))?[\s.!?]*$").unwrap(), Intent::Greeting),
    (Regex::new(r"(?i)\b(?:busco|buscando|mostrame|mu[eé]strame|quiero\s+ver|tienen|ten[eé]s|cat[aá]logo|colch[oó]n(?:es)?|sommiers?|almohadas?|respaldos?|base\s+de\s+cama|modelos?)\b").unwrap(), Intent::ProductSearch),
    (Regex::new(r"(?i)\b(?:precios?|cu[aá]nto\s+(?:cuesta|cuestan|sale|salen|vale|valen)|costo|valor)\b").unwrap(), Intent::PriceInquiry),
    (Regex::new(r"(?i)\b(?:env[ií]os?|env[ií]an|enviar|entrega|delivery|despacho|retiro|retirar)\b").unwrap(), Intent::ShippingInquiry),
    (Regex::new(r"(?i)\b(?:cotizaci[oó]n|cotizar|presupuesto|factura|por\s+mayor|mayorista)\b").unwrap(), Intent::QuoteRequest),
    (Regex::new(r"(?i)\b(?:comprar|compro|lo\s+quiero|la\s+quiero|me\s+lo\s+llevo|me\s+la\s+llevo|pagar|encargar|reservar)\b").unwrap(), Intent::PurchaseIntent),
    (Regex::new(r"(?i)\b(?:ayuda|ayudame|ay[uú]dame|problema|reclamo|garant[ií]a|devoluci[oó]n|consulta)\b").unwrap(), Intent::HelpRequest),
]);

static HANDOFF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?:hablar|comunicarme|chatear)\s+con\s+(?:un[ao]?\s+)?(?:asesor(?:a)?|vendedor(?:a)?|persona|humano|agente|representante)|atenci[oó]n\s+humana|asesor\s+humano)\b").unwrap()
});

static CATEGORY_HINTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| vec![
    (Regex::new(r"(?i)\bcolch[oó]n(?:es)?\b").unwrap(), "colchones"),
    (Regex::new(r"(?i)\bsommiers?\b").unwrap(), "sommiers"),
    (Regex::new(r"(?i)\balmohadas?\b").unwrap(), "almohadas"),
    (Regex::new(r"(?i)\brespaldos?\b").unwrap(), "respaldos"),
]);

/// Classify a user message.
///
/// Total and deterministic: every input yields exactly one intent, with
/// [`Intent::General`] when no rule matches. When a message matches several
/// rules the earlier one wins, so "cuanto cuesta el envío" is a
/// [`Intent::PriceInquiry`], not a shipping question.
pub fn classify(text: &str) -> Intent {
    let intent = INTENT_RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::General);

    trace!(%intent, "Classified message");
    intent
}

/// Whether the user is explicitly asking to talk to a person.
pub fn is_handoff_request(text: &str) -> bool {
    HANDOFF_PATTERN.is_match(text)
}

/// Catalog category named by the message, if any.
pub fn category_hint(text: &str) -> Option<&'static str> {
    CATEGORY_HINTS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings() {
        for text in ["Hola", "hola!", "Buenas tardes", "¡Hola, qué tal?", "buen día"] {
            assert_eq!(classify(text), Intent::Greeting, "{}", text);
        }
    }

    #[test]
    fn test_greeting_with_question_is_not_greeting() {
        assert_eq!(classify("Hola, busco un colchón"), Intent::ProductSearch);
    }

    #[test]
    fn test_product_search() {
        assert_eq!(classify("busco un colchón para 2 plazas"), Intent::ProductSearch);
        assert_eq!(classify("¿Tienen sommiers de 160?"), Intent::ProductSearch);
    }

    #[test]
    fn test_price_beats_shipping() {
        assert_eq!(classify("cuanto cuesta el envío"), Intent::PriceInquiry);
        assert_eq!(classify("¿Cuánto sale?"), Intent::PriceInquiry);
    }

    #[test]
    fn test_remaining_rules() {
        assert_eq!(classify("¿Hacen envíos a Rosario?"), Intent::ShippingInquiry);
        assert_eq!(classify("necesito un presupuesto para un hotel"), Intent::QuoteRequest);
        assert_eq!(classify("lo quiero!"), Intent::PurchaseIntent);
        assert_eq!(classify("tengo un problema con mi pedido"), Intent::HelpRequest);
    }

    #[test]
    fn test_default_general() {
        assert_eq!(classify(""), Intent::General);
        assert_eq!(classify("gracias"), Intent::General);
        assert_eq!(classify("12345"), Intent::General);
    }

    #[test]
    fn test_deterministic() {
        let text = "quiero comprar pero primero decime el precio";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_handoff_request() {
        assert!(is_handoff_request("quiero hablar con un asesor"));
        assert!(is_handoff_request("Necesito hablar con una persona"));
        assert!(is_handoff_request("atención humana por favor"));
        assert!(!is_handoff_request("busco un colchón"));
    }

    #[test]
    fn test_category_hint() {
        assert_eq!(category_hint("busco un colchón"), Some("colchones"));
        assert_eq!(category_hint("Sommier 2 plazas"), Some("sommiers"));
        assert_eq!(category_hint("hola"), None);
    }
}
