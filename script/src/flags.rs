/// Script verification flags.
#[derive(Default, Debug, PartialEq, Clone, Copy)]
pub struct VerificationFlags {
	/// Evaluate P2SH subscripts.
	pub verify_p2sh: bool,

	/// Passing a non-strict-DER signature or one with undefined hashtype to a checksig operation causes script failure.
	pub verify_strictenc: bool,

	/// Passing a non-strict-DER signature to a checksig operation causes script failure.
	pub verify_dersig: bool,
}

impl VerificationFlags {
	pub fn verify_p2sh(mut self, value: bool) -> Self {
		self.verify_p2sh = value;
		self
	}

	pub fn verify_strictenc(mut self, value: bool) -> Self {
		self.verify_strictenc = value;
		self
	}

	pub fn verify_dersig(mut self, value: bool) -> Self {
		self.verify_dersig = value;
		self
	}

	/// Flags every generated block is validated under.
	pub fn standard() -> Self {
		VerificationFlags::default().verify_p2sh(true).verify_strictenc(true).verify_dersig(true)
	}
}
