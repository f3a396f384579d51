//! Bodies of the four contest notifications.

use chrono::{DateTime, Utc};
use storage::models::Contest;

use crate::request::EmailType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "próximamente".to_string())
}

fn layout(heading: &str, body: &str, cta_label: &str, cta_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<body style="font-family: Georgia, serif; max-width: 600px; margin: 0 auto; color: #1f2937;">
  <h1 style="color: #4f46e5;">{heading}</h1>
  {body}
  <p><a href="{cta_url}" style="background: #4f46e5; color: #fff; padding: 12px 20px; border-radius: 6px; text-decoration: none;">{cta_label}</a></p>
  <p style="font-size: 12px; color: #6b7280;">Recibes este correo porque formas parte de la comunidad de Letranido. Puedes cambiar tus preferencias desde tu perfil.</p>
</body>
</html>"#
    )
}

/// Renders a template mail for `contest`. `Manual` has no template and
/// yields `None`.
pub fn render(kind: EmailType, contest: &Contest, site_url: &str) -> Option<EmailContent> {
    let site_url = site_url.trim_end_matches('/');
    let contest_url = format!("{site_url}/contest/{}", contest.id);
    let title = &contest.title;
    let words = format!("{} a {} palabras", contest.min_words, contest.max_words);

    let content = match kind {
        EmailType::NewContest => {
            let deadline = format_date(contest.submission_deadline);
            let description = contest.description.clone().unwrap_or_default();
            EmailContent {
                subject: format!("Nuevo reto de escritura: {title}"),
                html: layout(
                    &format!("¡Nuevo reto: {title}!"),
                    &format!(
                        "<p>{description}</p><p>Extensión: {words}. Puedes enviar tu historia hasta el {deadline}.</p>"
                    ),
                    "Participar",
                    &contest_url,
                ),
                text: format!(
                    "Nuevo reto: {title}\n{description}\nExtensión: {words}. Envíos hasta el {deadline}.\n{contest_url}"
                ),
            }
        }
        EmailType::Reminder => {
            let deadline = format_date(contest.submission_deadline);
            EmailContent {
                subject: format!("Últimos días para participar en {title}"),
                html: layout(
                    "Se acaba el plazo",
                    &format!(
                        "<p>El reto <strong>{title}</strong> cierra los envíos el {deadline}. ¡Aún estás a tiempo!</p>"
                    ),
                    "Enviar mi historia",
                    &format!("{site_url}/write/{}", contest.id),
                ),
                text: format!(
                    "El reto {title} cierra los envíos el {deadline}.\n{site_url}/write/{}",
                    contest.id
                ),
            }
        }
        EmailType::VotingStarted => {
            let deadline = format_date(contest.voting_deadline);
            EmailContent {
                subject: format!("¡Empieza la votación de {title}!"),
                html: layout(
                    "Ya puedes votar",
                    &format!(
                        "<p>Las historias de <strong>{title}</strong> están listas. La votación está abierta hasta el {deadline}.</p>"
                    ),
                    "Leer y votar",
                    &contest_url,
                ),
                text: format!(
                    "La votación de {title} está abierta hasta el {deadline}.\n{contest_url}"
                ),
            }
        }
        EmailType::Results => EmailContent {
            subject: format!("Resultados de {title}"),
            html: layout(
                "¡Ya hay ganadores!",
                &format!(
                    "<p>El reto <strong>{title}</strong> ha terminado. Descubre las historias ganadoras y cómo ha quedado el ranking de karma.</p>"
                ),
                "Ver resultados",
                &contest_url,
            ),
            text: format!("Resultados de {title}:\n{contest_url}"),
        },
        EmailType::Manual => return None,
    };

    Some(content)
}
