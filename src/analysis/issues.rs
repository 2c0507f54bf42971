use crate::types::{
    BoundingBox, ColorMatch, FontMatch, Issue, IssueKind, MatchStatus, Suggestion,
};

/// Turn non-passing matches into numbered issues.
///
/// Color issues are discovered before font issues. The final list puts every
/// `Fail` before every `Warn` (stable, so discovery order survives within a
/// severity) and numbers it 1..N.
pub fn generate_issues(color_matches: &[ColorMatch], font_matches: &[FontMatch]) -> Vec<Issue> {
    let mut issues = issues_from_colors(color_matches);
    issues.extend(issues_from_fonts(font_matches));

    issues.sort_by_key(|issue| issue.status.severity_rank());
    for (i, issue) in issues.iter_mut().enumerate() {
        issue.number = i + 1;
    }
    issues
}

fn issues_from_colors(matches: &[ColorMatch]) -> Vec<Issue> {
    matches
        .iter()
        .filter(|m| m.status != MatchStatus::Pass)
        .enumerate()
        .map(|(i, m)| {
            let hex = m.source.color.to_hex();
            let (message, suggestion) = match (&m.matched_token, m.distance) {
                (Some(token), Some(distance)) => (
                    format!(
                        "Color {} is {:.2} ΔE00 away from token {} ({}).",
                        hex, distance, token.path, token.color
                    ),
                    Some(Suggestion {
                        token: token.path.clone(),
                        value: token.color.to_hex(),
                        handle: Some(token.handle.clone()),
                    }),
                ),
                _ => (
                    format!("Color {} has no color token to match against.", hex),
                    None,
                ),
            };
            Issue {
                id: format!("{}-{}", IssueKind::Color.as_str(), i + 1),
                number: 0,
                kind: IssueKind::Color,
                status: m.status,
                message,
                marker_position: m.source.centroid,
                bounding_box: m.source.bounding_box,
                source_value: hex,
                suggestion,
            }
        })
        .collect()
}

fn issues_from_fonts(matches: &[FontMatch]) -> Vec<Issue> {
    matches
        .iter()
        .filter(|m| m.status != MatchStatus::Pass)
        .enumerate()
        .map(|(i, m)| {
            let source = &m.source;
            let (message, suggestion) = match &m.matched_token {
                Some(token) => (
                    format!(
                        "Typography {} deviates from token '{}': {}.",
                        source.describe(),
                        token.role,
                        m.mismatch_reasons.join("; ")
                    ),
                    Some(Suggestion {
                        token: token.role.clone(),
                        value: token.describe(),
                        handle: None,
                    }),
                ),
                None => (
                    format!(
                        "Typography {} has no typography token to match against.",
                        source.describe()
                    ),
                    None,
                ),
            };
            Issue {
                id: format!("{}-{}", IssueKind::Font.as_str(), i + 1),
                number: 0,
                kind: IssueKind::Font,
                status: m.status,
                message,
                marker_position: source.position,
                bounding_box: source
                    .bounding_box
                    .unwrap_or_else(|| BoundingBox::at(source.position)),
                source_value: source.describe(),
                suggestion,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DeltaEThresholds;
    use crate::types::{
        ColorToken, LocatedColor, Point, Rgb, SampledColor, TypographyDescriptor,
        TypographyToken,
    };

    fn color_match(rgb: Rgb, distance: Option<f64>, at: Point) -> ColorMatch {
        let source = LocatedColor::fallback(
            &SampledColor {
                color: rgb,
                coverage_percentage: 10.0,
            },
            BoundingBox::new(0.0, 0.0, 20.0, 20.0),
            at,
        );
        let best = distance.map(|d| {
            (
                ColorToken {
                    path: "color.brand".into(),
                    handle: "--color-brand".into(),
                    color: Rgb::new(255, 0, 0),
                },
                d,
            )
        });
        ColorMatch::new(source, best, &DeltaEThresholds::default())
    }

    fn font_match(reasons: Vec<&str>) -> FontMatch {
        FontMatch::new(
            TypographyDescriptor {
                family: "Georgia".into(),
                size: 18.0,
                weight: Some(400),
                position: Point::new(40.0, 50.0),
                bounding_box: None,
            },
            Some(TypographyToken {
                role: "body".into(),
                family: "Inter".into(),
                size: 16.0,
                weight: 400,
            }),
            reasons.into_iter().map(String::from).collect(),
        )
    }

    #[test]
    fn pass_matches_never_become_issues() {
        let matches = vec![
            color_match(Rgb::new(255, 0, 0), Some(0.0), Point::default()),
            color_match(Rgb::new(250, 0, 0), Some(2.9), Point::default()),
        ];
        let issues = generate_issues(&matches, &[font_match(vec![])]);
        assert!(issues.is_empty());
    }

    #[test]
    fn fails_sort_before_warns_and_numbers_are_dense() {
        let matches = vec![
            color_match(Rgb::new(1, 1, 1), Some(5.0), Point::new(1.0, 1.0)),
            color_match(Rgb::new(2, 2, 2), Some(20.0), Point::new(2.0, 2.0)),
            color_match(Rgb::new(3, 3, 3), Some(6.0), Point::new(3.0, 3.0)),
            color_match(Rgb::new(4, 4, 4), None, Point::new(4.0, 4.0)),
        ];
        let fonts = vec![font_match(vec!["font size 18px differs from 16px"])];
        let issues = generate_issues(&matches, &fonts);

        let statuses: Vec<MatchStatus> = issues.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            vec![
                MatchStatus::Fail,
                MatchStatus::Fail,
                MatchStatus::Warn,
                MatchStatus::Warn,
                MatchStatus::Warn
            ]
        );
        let ids: Vec<&str> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["color-2", "color-4", "color-1", "color-3", "font-1"]);
        let numbers: Vec<usize> = issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn color_issue_embeds_distance_and_suggestion() {
        let issues = generate_issues(
            &[color_match(Rgb::new(255, 51, 0), Some(12.346), Point::new(7.0, 8.0))],
            &[],
        );
        let issue = &issues[0];
        assert_eq!(issue.kind, IssueKind::Color);
        assert!(issue.message.contains("12.35"), "message: {}", issue.message);
        assert_eq!(issue.source_value, "#FF3300");
        assert_eq!(issue.marker_position, Point::new(7.0, 8.0));
        let suggestion = issue.suggestion.as_ref().expect("suggestion");
        assert_eq!(suggestion.value, "#FF0000");
        assert_eq!(suggestion.handle.as_deref(), Some("--color-brand"));
    }

    #[test]
    fn color_issue_without_token_has_no_suggestion() {
        let issues = generate_issues(&[color_match(Rgb::new(9, 9, 9), None, Point::default())], &[]);
        assert_eq!(issues[0].status, MatchStatus::Fail);
        assert!(issues[0].suggestion.is_none());
        assert!(issues[0].message.contains("no color token"));
    }

    #[test]
    fn font_issue_joins_reasons_and_uses_descriptor_position() {
        let issues = generate_issues(
            &[],
            &[font_match(vec![
                "font family 'Georgia' does not match 'Inter'",
                "font size 18px differs from 16px",
            ])],
        );
        let issue = &issues[0];
        assert_eq!(issue.kind, IssueKind::Font);
        assert_eq!(issue.status, MatchStatus::Fail);
        assert!(issue.message.contains("Georgia' does not match 'Inter'; font size"));
        assert_eq!(issue.marker_position, Point::new(40.0, 50.0));
        assert_eq!(issue.bounding_box, BoundingBox::new(40.0, 50.0, 0.0, 0.0));
        assert_eq!(issue.suggestion.as_ref().unwrap().token, "body");
    }
}
