use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, Ident, LitStr, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_row(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromRow` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromRow` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let columns = fields.iter().map(|field| {
        let tag = &field.tag;
        let kind = match &field.binding {
            Binding::Primitive(primitive) => {
                let kind = format_ident!("{}", primitive.kind());
                quote! { ::trestle::Kind::#kind }
            }
            Binding::Handler(_) => quote! { ::trestle::Kind::Custom },
        };

        quote! { ::trestle::Column { tag: #tag, kind: #kind } }
    });

    // Group setter cases by the primitive method receiving them.
    let mut setter_cases: [Vec<_>; 5] = Default::default();
    let mut custom_cases = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let name = &field.name;
        let ty = &field.ty;

        match &field.binding {
            Binding::Primitive(primitive) => {
                let assignment = match primitive {
                    Primitive::String => quote! { self.#name = value.to_owned() },
                    Primitive::Bool => quote! { self.#name = value },
                    _ => quote! { self.#name = value as #ty },
                };

                setter_cases[*primitive as usize].push(quote! { #index => { #assignment } });
            }
            Binding::Handler(handler) => {
                let body = &handler.body;
                let acc = handler.inputs.iter().nth(0).unwrap();
                let val = handler.inputs.iter().nth(1).unwrap();

                custom_cases.push(quote! {
                    #index => (|#acc: &mut #ty, #val: &[u8]| { #body })(&mut self.#name, raw),
                });
            }
        }
    }

    let setter_methods = [
        Primitive::String,
        Primitive::Int,
        Primitive::Uint,
        Primitive::Bool,
        Primitive::Float,
    ]
    .into_iter()
    .filter_map(|primitive| {
        let cases = &setter_cases[primitive as usize];
        if cases.is_empty() {
            return None;
        }

        let method = format_ident!("set_{}", primitive.method());
        let value = primitive.parameter();

        Some(quote! {
            fn #method(&mut self, column: usize, value: #value) {
                match column {
                    #(#cases)*
                    _ => {}
                };
            }
        })
    });

    let custom_method = (!custom_cases.is_empty()).then(|| {
        quote! {
            fn set_custom(
                &mut self,
                column: usize,
                raw: &[u8],
            ) -> ::std::result::Result<(), ::trestle::CustomError> {
                match column {
                    #(#custom_cases)*
                    _ => Ok(()),
                }
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl ::trestle::FromRow for #name {
            fn columns() -> &'static [::trestle::Column] {
                const COLUMNS: &[::trestle::Column] = &[#(#columns),*];
                COLUMNS
            }

            #(#setter_methods)*
            #custom_method
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    tag: LitStr,
    binding: Binding,
}

#[derive(Debug)]
enum Binding {
    Primitive(Primitive),
    Handler(ExprClosure),
}

#[derive(Debug, Clone, Copy)]
enum Primitive {
    String = 0,
    Int = 1,
    Uint = 2,
    Bool = 3,
    Float = 4,
}

impl Primitive {
    /// The `Kind` variant for this primitive.
    fn kind(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Uint => "Uint",
            Self::Bool => "Bool",
            Self::Float => "Float",
        }
    }

    /// The suffix of the setter method receiving this primitive.
    fn method(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Float => "float",
        }
    }

    /// The type of the setter method's value parameter.
    fn parameter(self) -> proc_macro2::TokenStream {
        match self {
            Self::String => quote! { &str },
            Self::Int => quote! { i64 },
            Self::Uint => quote! { u64 },
            Self::Bool => quote! { bool },
            Self::Float => quote! { f64 },
        }
    }
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("column")) else {
            return Ok(None);
        };

        let ColumnAttribute { tag, handler } = attr.meta.require_list()?.parse_args()?;

        let binding = match handler {
            Some(handler) => {
                if handler.inputs.len() != 2 {
                    Err(Error::new_spanned(
                        &handler,
                        "Handler closure must have two parameters.",
                    ))?
                }

                Binding::Handler(handler)
            }
            None => Binding::Primitive(infer_primitive(&field.ty)?),
        };

        Ok(Some(Self {
            name,
            ty: field.ty.clone(),
            tag,
            binding,
        }))
    }
}

/// Infer a column's primitive kind from its field's type.
fn infer_primitive(ty: &Type) -> Result<Primitive> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    let primitive = match segment.ident.to_string().as_str() {
        "String" => Primitive::String,
        "i8" | "i16" | "i32" | "i64" | "isize" => Primitive::Int,
        "u8" | "u16" | "u32" | "u64" | "usize" => Primitive::Uint,
        "bool" => Primitive::Bool,
        "f32" | "f64" => Primitive::Float,
        _ => Err(Error::new_spanned(
            ty,
            "Field without a handler must have type `String`, a sized integer, `bool`, `f32`, or `f64`.",
        ))?,
    };

    Ok(primitive)
}

#[derive(Debug)]
struct ColumnAttribute {
    tag: LitStr,
    handler: Option<ExprClosure>,
}

impl Parse for ColumnAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let tag = input.parse::<LitStr>()?;

        if tag.value().is_empty() {
            Err(Error::new_spanned(
                &tag,
                "Column tag must not be empty; remove the attribute to leave a field unbound.",
            ))?
        }

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { tag, handler })
    }
}
