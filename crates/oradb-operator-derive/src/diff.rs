use darling::{
    ast::Data,
    util::Ignored,
    FromDeriveInput, FromField, FromMeta,
};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{parse_quote, DeriveInput, Generics, Index, Path, WherePredicate};

#[derive(FromMeta)]
struct PathOverrides {
    #[darling(default = "PathOverrides::default_diff")]
    diff: Path,
}
impl Default for PathOverrides {
    fn default() -> Self {
        Self {
            diff: Self::default_diff(),
        }
    }
}
impl PathOverrides {
    fn default_diff() -> Path {
        parse_quote!(::oradb_operator::diff)
    }
}

// Enums are compared as one unit (see the `Atomic` trait in the main crate),
// so the derive only accepts structs. darling turns everything else into a
// compile error pointing at the derive site.
#[derive(FromDeriveInput)]
#[darling(attributes(diff), supports(struct_any))]
struct DiffInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, DiffField>,
    #[darling(default)]
    path_overrides: PathOverrides,
    #[darling(default)]
    bound: Option<Vec<WherePredicate>>,
}

#[derive(FromField)]
struct DiffField {
    ident: Option<Ident>,
}

pub fn derive(input: DeriveInput) -> TokenStream {
    let DiffInput {
        ident,
        mut generics,
        data,
        path_overrides: PathOverrides { diff: diff_mod },
        bound,
    } = match DiffInput::from_derive_input(&input) {
        Ok(input) => input,
        Err(err) => return err.write_errors(),
    };

    let fields = match data {
        Data::Struct(fields) => fields,
        Data::Enum(_) => unreachable!("rejected by the shape validation above"),
    };

    let constructor: Path = parse_quote! {#ident};
    let self_ident = format_ident!("self");
    let last_ident = format_ident!("last");
    let field_idents = fields.iter().map(|field| field.ident.as_ref());
    let self_pattern = map_fields_to_prefixed_vars(&constructor, field_idents.clone(), &self_ident);
    let last_pattern = map_fields_to_prefixed_vars(&constructor, field_idents, &last_ident);
    let body = fields
        .into_iter()
        .enumerate()
        .map(|(field_index, field)| {
            let field_ident = field.ident.as_ref().ok_or(field_index);
            let self_field = prefix_ident(field_ident, &self_ident);
            let last_field = prefix_ident(field_ident, &last_ident);
            quote! {
                changed |= #diff_mod::Diff::mask_unchanged(#self_field, #last_field);
            }
        })
        .collect::<TokenStream>();

    if let Some(bound) = bound {
        let where_clause = generics.make_where_clause();
        where_clause.predicates.extend(bound);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #diff_mod::Diff for #ident #ty_generics #where_clause {
            fn mask_unchanged(&mut self, last_applied: &Self) -> bool {
                let #self_pattern = self;
                let #last_pattern = last_applied;
                let mut changed = false;
                #body
                changed
            }
        }
    }
}

fn map_fields_to_prefixed_vars<'a>(
    constructor: &Path,
    fields: impl IntoIterator<Item = Option<&'a Ident>>,
    prefix: &Ident,
) -> TokenStream {
    let fields = fields
        .into_iter()
        .enumerate()
        .map(|(index, field)| {
            let prefixed = prefix_ident(field.ok_or(index), prefix);
            if let Some(field) = field {
                quote! { #field: #prefixed, }
            } else {
                let index = Index::from(index);
                quote! { #index: #prefixed, }
            }
        })
        .collect::<TokenStream>();
    quote! { #constructor { #fields } }
}

fn prefix_ident(ident: Result<&Ident, usize>, prefix: &Ident) -> Ident {
    match ident {
        Ok(ident) => format_ident!("{prefix}_{ident}"),
        Err(index) => format_ident!("{prefix}_{index}"),
    }
}
