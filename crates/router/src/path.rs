use std::fmt;

use ctype_primitives::RouteParams;

use crate::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Static(String),
	Param(String),
}

/// Parsed route path template such as `/admin/content/article/:_id/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
	template: String,
	segments: Vec<Segment>,
}

impl PathPattern {
	pub fn parse(template: &str) -> Result<Self, RouteError> {
		let invalid = |reason: &str| RouteError::InvalidPath {
			path: template.to_string(),
			reason: reason.to_string(),
		};
		let rest = template
			.strip_prefix('/')
			.ok_or_else(|| invalid("must start with '/'"))?;
		let mut segments = Vec::new();
		for part in rest.split('/').filter(|p| !p.is_empty()) {
			match part.strip_prefix(':') {
				Some("") => return Err(invalid("empty parameter name")),
				Some(name) => {
					if segments
						.iter()
						.any(|s| matches!(s, Segment::Param(n) if n == name))
					{
						return Err(invalid("repeated parameter name"));
					}
					segments.push(Segment::Param(name.to_string()));
				}
				None => segments.push(Segment::Static(part.to_string())),
			}
		}
		Ok(Self {
			template: template.to_string(),
			segments,
		})
	}

	pub fn template(&self) -> &str {
		&self.template
	}

	pub fn params(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().filter_map(|s| match s {
			Segment::Param(name) => Some(name.as_str()),
			Segment::Static(_) => None,
		})
	}

	/// Number of literal segments; more literals means a more specific route.
	pub fn static_segments(&self) -> usize {
		self.segments
			.iter()
			.filter(|s| matches!(s, Segment::Static(_)))
			.count()
	}

	/// Matches a concrete path, returning the captured parameters.
	///
	/// Query strings and trailing slashes are ignored.
	pub fn matches(&self, path: &str) -> Option<RouteParams> {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let mut parts = path
			.strip_prefix('/')?
			.split('/')
			.filter(|p| !p.is_empty());
		let mut params = RouteParams::new();
		for segment in &self.segments {
			let part = parts.next()?;
			match segment {
				Segment::Static(s) if s == part => {}
				Segment::Static(_) => return None,
				Segment::Param(name) => params.insert(name.as_str(), part),
			}
		}
		parts.next().is_none().then_some(params)
	}

	/// Fills the template with `params`.
	pub fn build(&self, params: &RouteParams) -> Result<String, RouteError> {
		let mut out = String::new();
		for segment in &self.segments {
			out.push('/');
			match segment {
				Segment::Static(s) => out.push_str(s),
				Segment::Param(name) => {
					let value = params.get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
						RouteError::MissingParam {
							path: self.template.clone(),
							param: name.clone(),
						}
					})?;
					out.push_str(value);
				}
			}
		}
		if out.is_empty() {
			out.push('/');
		}
		Ok(out)
	}
}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.template)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::index("/admin/content/article/index", "/admin/content/article/index", &[])]
	#[case::item("/admin/content/article/:_id", "/admin/content/article/a1", &[("_id", "a1")])]
	#[case::edit("/admin/content/article/:_id/edit", "/admin/content/article/a1/edit?x=1", &[("_id", "a1")])]
	#[case::trailing("/a/:x", "/a/b/", &[("x", "b")])]
	fn matches_concrete_paths(
		#[case] template: &str,
		#[case] path: &str,
		#[case] expected: &[(&str, &str)],
	) {
		let pattern = PathPattern::parse(template).unwrap();
		let expected: RouteParams = expected.iter().copied().collect();
		assert_eq!(pattern.matches(path), Some(expected));
	}

	#[rstest]
	#[case("/admin/content/article/:_id", "/admin/content/article")]
	#[case("/admin/content/article/:_id", "/admin/content/article/a1/edit")]
	#[case("/admin/content/article/index", "/admin/content/page/index")]
	#[case("/a", "a")]
	fn rejects_other_paths(#[case] template: &str, #[case] path: &str) {
		assert_eq!(PathPattern::parse(template).unwrap().matches(path), None);
	}

	#[test]
	fn build_fills_params() {
		let pattern = PathPattern::parse("/admin/content/article/:_id/edit").unwrap();
		let params = RouteParams::new().with("_id", "a1");
		assert_eq!(pattern.build(&params).unwrap(), "/admin/content/article/a1/edit");
		assert!(matches!(
			pattern.build(&RouteParams::new()),
			Err(RouteError::MissingParam { param, .. }) if param == "_id"
		));
	}

	#[rstest]
	#[case("admin/index")]
	#[case("/a/:")]
	#[case("/a/:x/:x")]
	fn parse_rejects_bad_templates(#[case] template: &str) {
		assert!(matches!(
			PathPattern::parse(template),
			Err(RouteError::InvalidPath { .. })
		));
	}
}
