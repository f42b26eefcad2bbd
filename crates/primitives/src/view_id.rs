use std::fmt;

use crate::{Ctid, DisplayName, EndpointKey, ThemeName};

/// Family a view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewPrefix {
	/// Renders one display of one endpoint.
	Display,
	/// Bound to a route; delegates to the active display view.
	Wrapper,
	/// Terminal fallback when no display view exists.
	NotFound,
}

impl ViewPrefix {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Display => "CT",
			Self::Wrapper => "CT_Wrapper",
			Self::NotFound => "CT_NotFound",
		}
	}
}

/// Structured identity of a view: `(prefix, key, theme, display, ctid)`.
///
/// Source views (registered by a theme) carry no `ctid`. Specializations add
/// the `ctid`, plus the endpoint key for wrappers and the endpoint key and
/// requested display for not-found views, so two content types can never
/// share a specialized identity. A display view cloned from another display's
/// source records that display in `origin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId {
	pub prefix: ViewPrefix,
	pub key: Option<EndpointKey>,
	pub theme: ThemeName,
	pub display: Option<DisplayName>,
	pub origin: Option<DisplayName>,
	pub ctid: Option<Ctid>,
}

impl ViewId {
	/// Source view for `display` of endpoint `key` in `theme`.
	pub fn display(key: EndpointKey, theme: ThemeName, display: DisplayName) -> Self {
		Self {
			prefix: ViewPrefix::Display,
			key: Some(key),
			theme,
			display: Some(display),
			origin: None,
			ctid: None,
		}
	}

	/// Source wrapper view of `theme`.
	pub fn wrapper(theme: ThemeName) -> Self {
		Self {
			prefix: ViewPrefix::Wrapper,
			key: None,
			theme,
			display: None,
			origin: None,
			ctid: None,
		}
	}

	/// Source not-found view of `theme`.
	pub fn not_found(theme: ThemeName) -> Self {
		Self {
			prefix: ViewPrefix::NotFound,
			key: None,
			theme,
			display: None,
			origin: None,
			ctid: None,
		}
	}

	/// Display view specialized for one content type.
	pub fn for_content_type(&self, ctid: &Ctid) -> Self {
		Self {
			ctid: Some(ctid.clone()),
			..self.clone()
		}
	}

	/// Display view standing in for `display` of one content type, cloned
	/// from this source of another display.
	pub fn for_fallback(&self, display: &DisplayName, ctid: &Ctid) -> Self {
		Self {
			display: Some(display.clone()),
			origin: self.display.clone(),
			ctid: Some(ctid.clone()),
			..self.clone()
		}
	}

	/// Wrapper specialized for one endpoint of one content type.
	pub fn for_endpoint(&self, key: &EndpointKey, ctid: &Ctid) -> Self {
		Self {
			key: Some(key.clone()),
			ctid: Some(ctid.clone()),
			..self.clone()
		}
	}

	/// Not-found view specialized for one unresolved request.
	pub fn for_request(&self, key: &EndpointKey, display: &DisplayName, ctid: &Ctid) -> Self {
		Self {
			key: Some(key.clone()),
			display: Some(display.clone()),
			ctid: Some(ctid.clone()),
			..self.clone()
		}
	}

	pub fn is_specialized(&self) -> bool {
		self.ctid.is_some()
	}

	/// Identity of the view this specialization was cloned from.
	///
	/// Returns `None` for source views.
	pub fn source(&self) -> Option<Self> {
		self.ctid.as_ref()?;
		Some(match self.prefix {
			ViewPrefix::Display => Self {
				display: self.origin.clone().or_else(|| self.display.clone()),
				origin: None,
				ctid: None,
				..self.clone()
			},
			ViewPrefix::Wrapper | ViewPrefix::NotFound => Self {
				prefix: self.prefix,
				key: None,
				theme: self.theme.clone(),
				display: None,
				origin: None,
				ctid: None,
			},
		})
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.prefix.as_str())?;
		if let Some(key) = &self.key {
			write!(f, "_{}", key.view_segment())?;
		}
		write!(f, "_{}", self.theme)?;
		if let Some(display) = &self.display {
			write!(f, "_{display}")?;
		}
		if let Some(origin) = &self.origin {
			write!(f, "_from_{origin}")?;
		}
		if let Some(ctid) = &self.ctid {
			write!(f, "_{ctid}")?;
		}
		Ok(())
	}
}
