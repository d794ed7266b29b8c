macro_rules! bx {
	($x:expr) => {
		::std::boxed::Box::new($x)
	};
}

pub(crate) use bx;

macro_rules! arc {
	($x:expr) => {
		::std::sync::Arc::new($x)
	};
}

pub(crate) use arc;
