//! Scripted replies.
//!
//! Everything the assistant says without the AI lives here.

/// Menu shown in answer to a bare greeting.
pub const GREETING_MENU: &str = "¡Hola! 👋 Soy el asistente virtual de la tienda. Puedo ayudarte a:\n\
• Buscar colchones, sommiers y almohadas\n\
• Consultar precios\n\
• Informarte sobre envíos\n\
• Pedir un presupuesto\n\
Si preferís, escribí \"hablar con un asesor\" y te contacta una persona del equipo. ¿Qué estás buscando?";

/// First step of the human handoff.
pub const ASK_HANDOFF_TOPIC: &str =
    "¡Claro! Te comunico con un asesor. Contame brevemente en qué necesitás ayuda.";

/// Second step of the human handoff.
pub const ASK_CONTACT_DATA: &str = "Perfecto. Para que un asesor te contacte, pasame tu nombre \
y un email o teléfono de contacto.";

/// Closing message of the human handoff.
pub const HANDOFF_CONFIRMATION: &str = "¡Gracias! Ya le pasamos tu consulta a un asesor, que se \
va a comunicar con vos a la brevedad.";

/// Offered after a purchase intent about products already shown.
pub const PURCHASE_FOLLOW_UP: &str = "¿Querés que un asesor te contacte para cerrar la compra? \
Escribí \"hablar con un asesor\" y te ayudamos con el pago y el envío.";

/// WhatsApp reply to images, audio, stickers and other non-text messages.
pub const TEXT_ONLY: &str = "Por ahora sólo puedo leer mensajes de texto. ¿Me escribís tu consulta?";

/// Used when the AI fails or times out.
pub fn fallback(contact_channel: &str) -> String {
    format!(
        "Disculpá, en este momento no puedo responder tu consulta. Podés intentar de nuevo en \
         unos minutos o comunicarte con nosotros: {}",
        contact_channel
    )
}

/// Used when a turn failed unexpectedly.
pub fn apology(contact_channel: &str) -> String {
    format!(
        "Lo sentimos, ocurrió un error inesperado. Por favor comunicate con nosotros: {}",
        contact_channel
    )
}
