use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock},
};

use bytes::{BufMut, BytesMut};
use thiserror::Error;

use crate::protocol::{
    CodecError, CodecOpts, Decode, Encode,
    tags::{TagError, TagOpts},
    wire,
};

pub(crate) const NIL_RECORD: u8 = 0xff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error("two fields share order {0}")]
    DuplicateOrder(i32),
    #[error("compact and raw cannot be combined on one field")]
    CompactAndRaw,
}

type EncodeFn<R> = Box<dyn Fn(&R, &mut BytesMut, &CodecOpts) -> Result<(), CodecError> + Send + Sync>;
type DecodeFn<R> = Box<dyn Fn(&mut R, &mut BytesMut, &CodecOpts) -> Result<(), CodecError> + Send + Sync>;

pub struct Field<R> {
    tag: &'static str,
    encode: EncodeFn<R>,
    decode: DecodeFn<R>,
}

impl<R: 'static> Field<R> {
    pub fn new<T>(tag: &'static str, get: fn(&R) -> &T, get_mut: fn(&mut R) -> &mut T) -> Self
    where
        T: Encode + Decode + 'static,
    {
        Self {
            tag,
            encode: Box::new(move |record, buf, opts| get(record).encode(buf, opts)),
            decode: Box::new(move |record, buf, opts| {
                *get_mut(record) = T::decode(buf, opts)?;
                Ok(())
            }),
        }
    }
}

pub trait Record: Default + Send + Sync + 'static {
    fn fields() -> Vec<Field<Self>>;
}

struct LayoutField<R> {
    member_index: usize,
    opts: TagOpts,
    encode: EncodeFn<R>,
    decode: DecodeFn<R>,
}

pub struct Layout<R> {
    fields: Vec<LayoutField<R>>,
}

impl<R: Record> Layout<R> {
    fn compute() -> Result<Self, LayoutError> {
        let mut fields = Vec::new();
        for (member_index, field) in R::fields().into_iter().enumerate() {
            let opts: TagOpts = field.tag.parse()?;
            if opts.compact && opts.raw {
                return Err(LayoutError::CompactAndRaw);
            }
            fields.push(LayoutField {
                member_index,
                opts,
                encode: field.encode,
                decode: field.decode,
            });
        }

        fields.sort_by_key(|field| field.opts.order);
        for pair in fields.windows(2) {
            if pair[0].opts.order == pair[1].opts.order {
                return Err(LayoutError::DuplicateOrder(pair[0].opts.order));
            }
        }

        Ok(Self { fields })
    }
}

impl<R> Layout<R> {
    pub fn members(&self) -> impl Iterator<Item = (usize, TagOpts)> + '_ {
        self.fields.iter().map(|field| (field.member_index, field.opts))
    }
}

static LAYOUTS: LazyLock<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

// misses compute outside the lock; losers of the publish race drop their copy
pub fn layout_of<R: Record>() -> Result<Arc<Layout<R>>, LayoutError> {
    let key = TypeId::of::<R>();

    if let Some(cached) = LAYOUTS.read().expect("layout cache poisoned").get(&key) {
        return Ok(downcast(cached));
    }

    let computed: Arc<dyn Any + Send + Sync> = Arc::new(Layout::<R>::compute()?);
    let mut cache = LAYOUTS.write().expect("layout cache poisoned");
    let published = cache.entry(key).or_insert_with(|| computed);
    Ok(downcast(published))
}

fn downcast<R: Record>(entry: &Arc<dyn Any + Send + Sync>) -> Arc<Layout<R>> {
    Arc::clone(entry)
        .downcast()
        .unwrap_or_else(|_| panic!("layout cache entry matches its type key"))
}

pub fn encode_record<R: Record>(
    record: &R,
    buf: &mut BytesMut,
    opts: &CodecOpts,
) -> Result<(), CodecError> {
    let layout = layout_of::<R>()?;
    for field in &layout.fields {
        if field.opts.min_version > opts.version {
            continue;
        }
        (field.encode)(record, buf, &opts.for_field(&field.opts))?;
    }
    Ok(())
}

pub fn decode_record<R: Record>(buf: &mut BytesMut, opts: &CodecOpts) -> Result<R, CodecError> {
    if opts.nilable && wire::get_u8(buf)? == NIL_RECORD {
        return Ok(R::default());
    }
    decode_fields(buf, opts)
}

fn decode_fields<R: Record>(buf: &mut BytesMut, opts: &CodecOpts) -> Result<R, CodecError> {
    let layout = layout_of::<R>()?;
    let mut record = R::default();
    for field in &layout.fields {
        if field.opts.min_version > opts.version {
            continue;
        }
        (field.decode)(&mut record, buf, &opts.for_field(&field.opts))?;
    }
    Ok(record)
}

impl<R: Record> Encode for Option<R> {
    fn encode(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError> {
        match self {
            Some(record) => encode_record(record, buf, opts),
            None if opts.nilable => {
                buf.put_u8(NIL_RECORD);
                Ok(())
            }
            None => Err(CodecError::AbsentRecord),
        }
    }
}

impl<R: Record> Decode for Option<R> {
    fn decode(buf: &mut BytesMut, opts: &CodecOpts) -> Result<Self, CodecError> {
        if opts.nilable && wire::get_u8(buf)? == NIL_RECORD {
            return Ok(None);
        }
        Ok(Some(decode_fields(buf, opts)?))
    }
}

macro_rules! impl_record_codec {
    ($($record:ty),+ $(,)?) => {
        $(
            impl $crate::protocol::Encode for $record {
                fn encode(
                    &self,
                    buf: &mut bytes::BytesMut,
                    opts: &$crate::protocol::CodecOpts,
                ) -> Result<(), $crate::protocol::CodecError> {
                    $crate::protocol::layout::encode_record(self, buf, opts)
                }
            }

            impl $crate::protocol::Decode for $record {
                fn decode(
                    buf: &mut bytes::BytesMut,
                    opts: &$crate::protocol::CodecOpts,
                ) -> Result<Self, $crate::protocol::CodecError> {
                    $crate::protocol::layout::decode_record(buf, opts)
                }
            }
        )+
    };
}

pub(crate) use impl_record_codec;
