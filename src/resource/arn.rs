//! ARN helpers

use super::error::HandlerError;

/// `arn:partition:service:region:account:project:<id>`
const PROJECT_ARN_SEGMENTS: usize = 7;

/// Derive the project id (the segment after the last colon) from a project ARN
pub fn project_id_from_arn(arn: &str) -> Result<&str, HandlerError> {
    let malformed = |reason| HandlerError::MalformedIdentifier {
        arn: arn.to_string(),
        reason,
    };

    let segments: Vec<&str> = arn.split(':').collect();
    if segments[0] != "arn" {
        return Err(malformed("does not start with \"arn\""));
    }
    if segments.len() < PROJECT_ARN_SEGMENTS {
        return Err(malformed("too few colon-separated segments"));
    }

    match segments.last() {
        Some(&id) if !id.is_empty() => Ok(id),
        _ => Err(malformed("empty project id")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id() {
        assert_eq!(
            project_id_from_arn("arn:aws:devicefarm:us-west-2:account-id:project:12345").unwrap(),
            "12345"
        );
    }

    #[test]
    fn test_project_id_uses_last_segment() {
        assert_eq!(
            project_id_from_arn("arn:aws:devicefarm:us-west-2:1:project:a:b").unwrap(),
            "b"
        );
    }

    #[test]
    fn test_malformed_arns() {
        for arn in [
            "",
            "12345",
            "arn:top-devices",
            "arn:aws:devicefarm:us-west-2:1:12345",
            "arn:aws:devicefarm:us-west-2:1:project:",
            "nra:aws:devicefarm:us-west-2:1:project:12345",
        ] {
            let err = project_id_from_arn(arn).unwrap_err();
            assert!(
                matches!(err, HandlerError::MalformedIdentifier { .. }),
                "{arn} should be malformed"
            );
        }
    }
}
