//! Display and wrapper view resolution.
//!
//! # Fallback order
//!
//! 1. Theme view for the endpoint and the requested display
//! 2. Theme view for the endpoint and the `default` display, when the
//!    endpoint declares the requested display
//! 3. The theme's not-found view, or the `default` theme's when the theme has
//!    none
//!
//! The chosen source is then specialized for the content type. Specializations
//! are memoized in the namespace; [`ViewResolver::force_refresh`] re-clones one.

use ctype_primitives::{Ctid, DisplayName, EndpointKey, ThemeName, ViewId};
use ctype_views::{Helper, ViewError, ViewNamespace, register_default_theme};
use serde_json::json;
use tracing::{debug, warn};

/// Helper carrying diagnostics on not-found views.
pub const NOT_FOUND_HELPER: &str = "ctNotFound";

/// Source view picked for a display request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySource {
	/// The theme's view for the requested display.
	Requested(ViewId),
	/// The theme's `default` view, standing in for a declared display.
	Fallback(ViewId),
	NotFound(ViewId),
}

/// Resolves endpoint displays to specialized views.
#[derive(Debug, Clone)]
pub struct ViewResolver {
	views: ViewNamespace,
}

impl ViewResolver {
	/// Wraps `views`, seeding the `default` theme if it is missing so the
	/// terminal not-found view always exists.
	pub fn new(views: ViewNamespace) -> Self {
		register_default_theme(&views);
		Self { views }
	}

	pub fn views(&self) -> &ViewNamespace {
		&self.views
	}

	/// Source view for a display request, following the fallback order.
	///
	/// The `default` display stands in only for displays the endpoint
	/// `declared`; any other missing display resolves to not-found.
	pub fn source_for(
		&self,
		key: &EndpointKey,
		theme: &ThemeName,
		name: &DisplayName,
		declared: bool,
	) -> DisplaySource {
		let requested = ViewId::display(key.clone(), theme.clone(), name.clone());
		if self.views.exists(&requested) {
			return DisplaySource::Requested(requested);
		}
		if declared && !name.is_default() {
			let fallback = ViewId::display(key.clone(), theme.clone(), DisplayName::default_display());
			if self.views.exists(&fallback) {
				debug!(
					endpoint = %key,
					theme = %theme,
					display = %name,
					"display view missing, using default display"
				);
				return DisplaySource::Fallback(fallback);
			}
		}
		let themed = ViewId::not_found(theme.clone());
		if self.views.exists(&themed) {
			return DisplaySource::NotFound(themed);
		}
		DisplaySource::NotFound(ViewId::not_found(ThemeName::default_theme()))
	}

	/// Resolves the view rendering display `name` of endpoint `key` for `ctid`.
	///
	/// Never fails: a missing display degrades to the not-found view, which
	/// carries the request in its `ctNotFound` helper. Each requested display
	/// gets its own specialization, so bindings attached for one display never
	/// show up under another.
	pub fn resolve_display_view(
		&self,
		key: &EndpointKey,
		theme: &ThemeName,
		name: &DisplayName,
		ctid: &Ctid,
		declared: bool,
	) -> ViewId {
		let source = match self.source_for(key, theme, name, declared) {
			DisplaySource::Requested(source) => {
				let target = source.for_content_type(ctid);
				self.specialize(&source, &target);
				return target;
			}
			DisplaySource::Fallback(source) => {
				let target = source.for_fallback(name, ctid);
				self.specialize(&source, &target);
				return target;
			}
			DisplaySource::NotFound(source) => source,
		};

		warn!(
			ctid = %ctid,
			endpoint = %key,
			theme = %theme,
			display = %name,
			"no view for display, falling back to not-found view"
		);
		let target = source.for_request(key, name, ctid);
		self.specialize(&source, &target);
		let diagnostics = json!({
			"requestedDisplay": name.as_str(),
			"endpoint": key.as_str(),
		});
		if let Err(err) = self.views.attach_helpers(
			&target,
			[(NOT_FOUND_HELPER.to_string(), Helper::value(diagnostics))]
				.into_iter()
				.collect(),
		) {
			warn!(view = %target, error = %err, "could not attach not-found diagnostics");
		}
		target
	}

	/// Resolves the per-endpoint wrapper view of `ctid`.
	///
	/// Uses the theme's wrapper, or the `default` theme's when the theme has none.
	pub fn resolve_wrapper_view(&self, key: &EndpointKey, theme: &ThemeName, ctid: &Ctid) -> ViewId {
		let themed = ViewId::wrapper(theme.clone());
		let source = if self.views.exists(&themed) {
			themed
		} else {
			debug!(theme = %theme, "theme has no wrapper view, using default theme wrapper");
			ViewId::wrapper(ThemeName::default_theme())
		};
		let target = source.for_endpoint(key, ctid);
		self.specialize(&source, &target);
		target
	}

	/// Re-clones a specialization from its source.
	pub fn force_refresh(&self, id: &ViewId) -> Result<(), ViewError> {
		self.views.force_refresh(id)
	}

	fn specialize(&self, source: &ViewId, target: &ViewId) {
		// Sources were checked above and the namespace is append-only.
		if let Err(err) = self.views.specialize(source, target.clone()) {
			warn!(source = %source, view = %target, error = %err, "specialization failed");
		}
	}
}

#[cfg(test)]
mod tests {
	use ctype_primitives::RouteParams;
	use ctype_views::{InsertAction, ThemeBuilder};
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;

	fn name(s: &str) -> DisplayName {
		DisplayName::new(s).unwrap()
	}

	fn ctid(s: &str) -> Ctid {
		Ctid::new(s).unwrap()
	}

	fn resolver_with_timeline() -> ViewResolver {
		let resolver = ViewResolver::new(ViewNamespace::new());
		ThemeBuilder::new(ThemeName::default_theme())
			.display(EndpointKey::Index, name("timeline"), |_| "timeline".into())
			.register(resolver.views())
			.unwrap();
		resolver
	}

	#[test]
	fn requested_display_wins() {
		let resolver = resolver_with_timeline();
		let id = resolver.resolve_display_view(
			&EndpointKey::Index,
			&ThemeName::default_theme(),
			&name("timeline"),
			&ctid("article"),
			true,
		);
		assert_eq!(id.to_string(), "CT_Index_default_timeline_article");
		assert!(resolver.views().exists(&id));
	}

	#[test]
	fn missing_declared_display_falls_back_to_default() {
		let resolver = resolver_with_timeline();
		let id = resolver.resolve_display_view(
			&EndpointKey::Read,
			&ThemeName::default_theme(),
			&name("timeline"),
			&ctid("article"),
			true,
		);
		assert_eq!(id.to_string(), "CT_Read_default_timeline_from_default_article");
		assert_eq!(
			id.source().unwrap().to_string(),
			"CT_Read_default_default"
		);
	}

	#[test]
	fn missing_undeclared_display_is_not_found() {
		let resolver = resolver_with_timeline();
		let id = resolver.resolve_display_view(
			&EndpointKey::Read,
			&ThemeName::default_theme(),
			&name("timeline"),
			&ctid("article"),
			false,
		);
		assert_eq!(id.to_string(), "CT_NotFound_Read_default_timeline_article");
		let data = resolver
			.views()
			.render(&id, &RouteParams::new(), None)
			.unwrap()
			.data;
		assert_eq!(
			data.get(NOT_FOUND_HELPER),
			Some(&json!({ "requestedDisplay": "timeline", "endpoint": "read" }))
		);
	}

	#[test]
	fn fallback_bindings_stay_off_the_default_view() {
		let resolver = ViewResolver::new(ViewNamespace::new());
		let theme = ThemeName::default_theme();
		let article = ctid("article");
		let cards = resolver.resolve_display_view(&EndpointKey::Read, &theme, &name("cards"), &article, true);
		resolver
			.views()
			.attach_helpers(&cards, [("cardsOnly".to_string(), Helper::value(true))].into_iter().collect())
			.unwrap();

		let default = resolver.resolve_display_view(
			&EndpointKey::Read,
			&theme,
			&DisplayName::default_display(),
			&article,
			true,
		);
		assert_ne!(cards, default);
		assert!(!resolver.views().get(&default).unwrap().helpers().contains_key("cardsOnly"));

		resolver.force_refresh(&cards).unwrap();
		assert!(resolver.views().get(&cards).unwrap().helpers().is_empty());
	}

	#[test]
	fn missing_default_falls_back_to_not_found() {
		let resolver = ViewResolver::new(ViewNamespace::new());
		let key = EndpointKey::new("export").unwrap();
		let id = resolver.resolve_display_view(
			&key,
			&ThemeName::default_theme(),
			&name("csv"),
			&ctid("article"),
			true,
		);
		assert_eq!(id.to_string(), "CT_NotFound_Export_default_csv_article");

		let data = resolver
			.views()
			.render(&id, &RouteParams::new(), None)
			.unwrap()
			.data;
		assert_eq!(
			data.get(NOT_FOUND_HELPER),
			Some(&json!({ "requestedDisplay": "csv", "endpoint": "export" }))
		);
	}

	#[test]
	fn unknown_theme_uses_default_terminal_views() {
		let resolver = ViewResolver::new(ViewNamespace::new());
		let dark = ThemeName::new("dark").unwrap();
		let display = resolver.resolve_display_view(
			&EndpointKey::Index,
			&dark,
			&DisplayName::default_display(),
			&ctid("article"),
			true,
		);
		assert_eq!(display.to_string(), "CT_NotFound_Index_default_default_article");

		let wrapper = resolver.resolve_wrapper_view(&EndpointKey::Index, &dark, &ctid("article"));
		assert_eq!(wrapper.to_string(), "CT_Wrapper_Index_default_article");
	}

	#[test]
	fn theme_wrapper_is_preferred() {
		let resolver = ViewResolver::new(ViewNamespace::new());
		let dark = ThemeName::new("dark").unwrap();
		ThemeBuilder::new(dark.clone())
			.wrapper(|_| "dark".into())
			.register(resolver.views())
			.unwrap();
		let wrapper = resolver.resolve_wrapper_view(&EndpointKey::Read, &dark, &ctid("page"));
		assert_eq!(wrapper.to_string(), "CT_Wrapper_Read_dark_page");
	}

	#[test]
	fn resolution_is_memoized_until_refreshed() {
		let resolver = ViewResolver::new(ViewNamespace::new());
		let args = (
			EndpointKey::Index,
			ThemeName::default_theme(),
			DisplayName::default_display(),
			ctid("article"),
		);
		let first = resolver.resolve_display_view(&args.0, &args.1, &args.2, &args.3, true);
		let count = resolver.views().len();
		resolver
			.views()
			.attach_helpers(&first, [("x".to_string(), Helper::value(1))].into_iter().collect())
			.unwrap();

		let second = resolver.resolve_display_view(&args.0, &args.1, &args.2, &args.3, true);
		assert_eq!(first, second);
		assert_eq!(resolver.views().len(), count);
		assert!(resolver.views().get(&second).unwrap().helpers().contains_key("x"));

		resolver.force_refresh(&second).unwrap();
		assert!(resolver.views().get(&second).unwrap().helpers().is_empty());
		assert_eq!(
			resolver.views().specialize(&first.source().unwrap(), first.clone()),
			Ok(InsertAction::KeptExisting)
		);
	}

	proptest! {
		#[test]
		fn distinct_ctids_never_share_views(
			a in "[a-z][a-z0-9_-]{0,12}",
			b in "[a-z][a-z0-9_-]{0,12}",
			display in prop_oneof![Just("default"), Just("timeline"), Just("cards")],
		) {
			prop_assume!(a != b);
			let resolver = resolver_with_timeline();
			for key in EndpointKey::BUILTIN {
				let left = resolver.resolve_display_view(
					&key,
					&ThemeName::default_theme(),
					&name(display),
					&ctid(&a),
					true,
				);
				let right = resolver.resolve_display_view(
					&key,
					&ThemeName::default_theme(),
					&name(display),
					&ctid(&b),
					true,
				);
				prop_assert_ne!(&left, &right);
				prop_assert_ne!(left.to_string(), right.to_string());
			}
		}
	}
}
