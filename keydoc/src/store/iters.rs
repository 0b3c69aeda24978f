use crate::common::Value;
use crate::errors::KeydocResult;

/// Source of keys for a [KeyIterator].
///
/// A provider yields every key of one namespace exactly once, in key order,
/// and then `None`. A backend error is yielded as an `Err` item; callers stop
/// at the first one.
pub trait KeyIteratorProvider {
    fn next_key(&mut self) -> Option<KeydocResult<String>>;
}

/// Source of values for a [ValueIterator].
pub trait ValueIteratorProvider {
    fn next_value(&mut self) -> Option<KeydocResult<Value>>;
}

/// A lazy, finite, one-shot sequence of keys.
///
/// `KeyIterator` wraps any [KeyIteratorProvider] behind the standard
/// [Iterator] interface. Iterators are not `Send`: a scan is started and
/// driven to completion by the operation that asked for it.
pub struct KeyIterator {
    provider: Box<dyn KeyIteratorProvider>,
}

impl KeyIterator {
    pub fn new<T: KeyIteratorProvider + 'static>(provider: T) -> Self {
        KeyIterator {
            provider: Box::new(provider),
        }
    }

    /// Builds a key iterator over any iterator of key results.
    pub fn from_results<I>(iter: I) -> Self
    where
        I: Iterator<Item = KeydocResult<String>> + 'static,
    {
        KeyIterator::new(IterAdapter { iter })
    }

    /// An iterator that ends immediately.
    pub fn empty() -> Self {
        KeyIterator::from_results(std::iter::empty())
    }
}

impl Iterator for KeyIterator {
    type Item = KeydocResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.provider.next_key()
    }
}

/// A lazy, finite, one-shot sequence of values.
pub struct ValueIterator {
    provider: Box<dyn ValueIteratorProvider>,
}

impl ValueIterator {
    pub fn new<T: ValueIteratorProvider + 'static>(provider: T) -> Self {
        ValueIterator {
            provider: Box::new(provider),
        }
    }

    /// Builds a value iterator over any iterator of value results.
    pub fn from_results<I>(iter: I) -> Self
    where
        I: Iterator<Item = KeydocResult<Value>> + 'static,
    {
        ValueIterator::new(IterAdapter { iter })
    }

    pub fn empty() -> Self {
        ValueIterator::from_results(std::iter::empty())
    }
}

impl Iterator for ValueIterator {
    type Item = KeydocResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.provider.next_value()
    }
}

struct IterAdapter<I> {
    iter: I,
}

impl<I> KeyIteratorProvider for IterAdapter<I>
where
    I: Iterator<Item = KeydocResult<String>>,
{
    fn next_key(&mut self) -> Option<KeydocResult<String>> {
        self.iter.next()
    }
}

impl<I> ValueIteratorProvider for IterAdapter<I>
where
    I: Iterator<Item = KeydocResult<Value>>,
{
    fn next_value(&mut self) -> Option<KeydocResult<Value>> {
        self.iter.next()
    }
}
