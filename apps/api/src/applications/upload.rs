use axum::extract::multipart::Field;
use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};

use crate::errors::AppError;
use crate::validation::optional_text;

pub const PDF_MIME: &str = "application/pdf";
const PDF_SIGNATURE: &[u8] = b"%PDF-";

pub const RESUME_FIELD: &str = "resume";
pub const COVER_LETTER_FIELD: &str = "cover_letter";

#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub contents: Bytes,
}

#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub resume: Option<ResumeUpload>,
    pub cover_letter: Option<String>,
}

/// Reads the `resume` file and optional `cover_letter` text from a multipart
/// body. Unknown fields are skipped. The résumé is validated as a PDF no larger
/// than `max_bytes`; reading stops as soon as the cap is exceeded.
pub async fn read_application_form(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                if field.content_type() != Some(PDF_MIME) {
                    return Err(only_pdf());
                }
                let contents = read_capped(field, max_bytes).await?;
                if !contents.starts_with(PDF_SIGNATURE) {
                    return Err(only_pdf());
                }
                form.resume = Some(ResumeUpload {
                    file_name,
                    contents,
                });
            }
            Some(COVER_LETTER_FIELD) => {
                form.cover_letter = optional_text(Some(field.text().await?));
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_capped(mut field: Field<'_>, max_bytes: usize) -> Result<Bytes, AppError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "Resume file is too large (limit {} bytes)",
                max_bytes
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn only_pdf() -> AppError {
    AppError::Validation("Only PDF files are allowed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "XBOUNDARYX";

    struct Part<'a> {
        name: &'a str,
        file_name: Option<&'a str>,
        content_type: Option<&'a str>,
        body: &'a [u8],
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
            if let Some(file_name) = part.file_name {
                disposition.push_str(&format!("; filename=\"{file_name}\""));
            }
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");
            if let Some(ct) = part.content_type {
                body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part.body);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn pdf<'a>(body: &'a [u8]) -> Part<'a> {
        Part {
            name: RESUME_FIELD,
            file_name: Some("cv.pdf"),
            content_type: Some(PDF_MIME),
            body,
        }
    }

    #[tokio::test]
    async fn test_reads_resume_and_cover_letter() {
        let mut mp = multipart(&[
            pdf(b"%PDF-1.7 body"),
            Part {
                name: COVER_LETTER_FIELD,
                file_name: None,
                content_type: None,
                body: b" Hire me ",
            },
        ])
        .await;

        let form = read_application_form(&mut mp, 1024).await.unwrap();
        let resume = form.resume.unwrap();
        assert_eq!(resume.file_name, "cv.pdf");
        assert_eq!(&resume.contents[..], b"%PDF-1.7 body");
        assert_eq!(form.cover_letter.as_deref(), Some("Hire me"));
    }

    #[tokio::test]
    async fn test_missing_resume_is_none() {
        let mut mp = multipart(&[Part {
            name: COVER_LETTER_FIELD,
            file_name: None,
            content_type: None,
            body: b"hello",
        }])
        .await;

        let form = read_application_form(&mut mp, 1024).await.unwrap();
        assert!(form.resume.is_none());
    }

    #[tokio::test]
    async fn test_non_pdf_mime_rejected() {
        let mut mp = multipart(&[Part {
            name: RESUME_FIELD,
            file_name: Some("cv.docx"),
            content_type: Some("application/msword"),
            body: b"%PDF-1.7",
        }])
        .await;

        let err = read_application_form(&mut mp, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Only PDF files are allowed"));
    }

    #[tokio::test]
    async fn test_pdf_mime_without_signature_rejected() {
        let mut mp = multipart(&[pdf(b"MZ not really a pdf")]).await;
        let err = read_application_form(&mut mp, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Only PDF files are allowed"));
    }

    #[tokio::test]
    async fn test_oversized_resume_rejected() {
        let mut big = b"%PDF-".to_vec();
        big.extend_from_slice(&[b'x'; 64]);
        let mut mp = multipart(&[pdf(&big)]).await;
        let err = read_application_form(&mut mp, 32).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("too large")));
    }

    #[tokio::test]
    async fn test_resume_exactly_at_cap_accepted() {
        let body = b"%PDF-1234";
        let mut mp = multipart(&[pdf(body)]).await;
        let form = read_application_form(&mut mp, body.len()).await.unwrap();
        assert_eq!(form.resume.unwrap().contents.len(), body.len());
    }
}
