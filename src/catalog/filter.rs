//! Filter expressions accepted by the `products` query.

// self
use crate::_prelude::*;

/// Filter expression selecting a subset of catalog items.
///
/// Codes are inserted verbatim, unquoted, in the order given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProductFilter(String);
impl ProductFilter {
	/// Empty filter selecting every product.
	pub fn all() -> Self {
		Self::default()
	}

	/// Selects the product whose code equals `code`.
	pub fn product_code(code: &str) -> Self {
		Self(format!("productCode eq {code}"))
	}

	/// Selects products matching any of `codes`, as a disjunction in the given order.
	pub fn product_codes<I, S>(codes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let clauses = codes
			.into_iter()
			.map(|code| format!("productCode eq {}", code.as_ref()))
			.collect::<Vec<_>>();

		Self(clauses.join(" or "))
	}

	/// Returns the expression text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for ProductFilter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
