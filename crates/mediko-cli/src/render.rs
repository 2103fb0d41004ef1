//! Plain-text views of a session for the terminal.

use mediko_core::{GuidanceResult, Urgency, ValidationError};
use mediko_service::GenerationError;
use mediko_session::{Session, SessionError};

const BAR_WIDTH: usize = 20;

pub const INTRO: &str = "Describe tus síntomas, molestias o dudas. Cuanto más completa sea la descripción, mejor.";
pub const QUESTIONS_INTRO: &str =
    "Responde estas preguntas para tener más antecedentes de lo que te ocurre.";
pub const TERMS_PROMPT: &str = "¿Aceptas los términos y condiciones? (s/n)";
pub const THANKS: &str = "Gracias por confiar en mediko!";
pub const NEW_GUIDANCE: &str = "🩺 Nueva orientación: escribe :nueva (o :salir para terminar)";
pub const REVIEW_HINT: &str = "Pulsa Enter para reintentar o :atras para corregir la última respuesta.";

/// `[██████░░░░░░] 3/7`
pub fn progress_bar(fraction: f32, position: usize, total: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f32).round()) as usize;
    format!(
        "[{}{}] {position}/{total}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

/// Five dots, filled up to the urgency level.
pub fn urgency_dots(urgency: Urgency) -> String {
    let level = urgency.level() as usize;
    let total = Urgency::ALL.len();
    format!("{}{}", "●".repeat(level), "○".repeat(total - level))
}

/// Counter for the answer being edited.
pub fn remaining(session: &Session) -> String {
    format!("({} caracteres restantes)", session.remaining_chars())
}

/// The description is typed in one line, so only its limit is shown.
pub fn description_limit(session: &Session) -> String {
    format!("(máximo {} caracteres)", session.limits().max_chars)
}

/// The current question with its progress bar and, when the user comes back
/// to an answered question, the text already recorded for it.
pub fn question(session: &Session) -> Option<String> {
    let index = session.phase().question_index()?;
    let q = session.current_question()?;
    let total = session.questions()?.len();

    let mut out = String::new();
    if let Some(fraction) = session.progress() {
        out.push_str(&progress_bar(fraction, index + 1, total));
        out.push('\n');
    }
    out.push_str(&format!("Pregunta {}/{total}: {}\n", index + 1, q.text));
    if !session.buffer().is_empty() {
        out.push_str(&format!(
            "Respuesta actual: {} (Enter para conservarla)\n",
            session.buffer()
        ));
    }
    if index == total - 1 {
        out.push_str("👨‍⚕️ Al responder se generará tu orientación.\n");
    }
    Some(out)
}

pub fn guidance(result: &GuidanceResult) -> String {
    let mut out = String::new();
    out.push_str("👨‍⚕️ Orientación médica\n\n");
    out.push_str(&result.guidance);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Urgencia: {} {}\n",
        urgency_dots(result.urgency),
        result.urgency.display_name()
    ));
    out.push_str(&result.urgency_rationale);
    out.push_str("\n\n");
    let chips: Vec<String> = result.keywords.iter().map(|k| format!("[{k}]")).collect();
    out.push_str(&format!("Posibles diagnósticos: {}\n\n", chips.join(" ")));
    out.push_str(THANKS);
    out.push('\n');
    out.push_str(NEW_GUIDANCE);
    out.push('\n');
    out
}

/// What the user is told when a step is refused or fails.
pub fn user_message(err: &SessionError) -> String {
    match err {
        SessionError::Validation(ValidationError::TermsNotAccepted) => {
            "Por favor, acepta los términos y condiciones antes de continuar.".into()
        }
        SessionError::Validation(ValidationError::Empty { field: "description" }) => {
            "Por favor, describe tus síntomas.".into()
        }
        SessionError::Validation(ValidationError::Empty { .. }) => {
            "Por favor, ingresa una respuesta.".into()
        }
        SessionError::Validation(ValidationError::TooLong { max, .. }) => {
            format!("El texto supera el máximo de {max} caracteres.")
        }
        SessionError::Validation(ValidationError::NumberedLine { line, .. }) => format!(
            "La línea {line} de tu respuesta empieza como una pregunta numerada (\"2. \"). Reescríbela, por favor."
        ),
        SessionError::Generation(GenerationError::MissingCredential) => {
            "Falta la clave de API. Configura MEDIKO_API_KEY.".into()
        }
        SessionError::Generation(GenerationError::Timeout(_)) => {
            "El servicio tardó demasiado en responder. Inténtalo de nuevo.".into()
        }
        SessionError::Generation(e) if e.is_schema_drift() => {
            "La respuesta del servicio no tuvo el formato esperado. Inténtalo de nuevo.".into()
        }
        SessionError::Generation(_) => {
            "No se pudo contactar el servicio de orientación. Inténtalo de nuevo.".into()
        }
        SessionError::InvalidTransition { .. } => "Esa acción no está disponible ahora.".into(),
    }
}
