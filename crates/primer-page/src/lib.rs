// SPDX-License-Identifier: MIT
//
// primer-page — Content layer for the primer slideshow viewer.
//
// Everything between raw content strings and the rows the terminal
// layer draws: the inline markup parser, the centering algorithm, the
// markdown-style document renderer with its punctuation-spacing pass,
// and the `Page` tagged union that ties the three layouts together
// behind one `render(width, height)` capability.
//
// Rendering is pure: a page given the same viewport twice produces
// byte-identical rows. All the mutation in the viewer lives on the
// other side of this crate.

pub mod deck;
pub mod document;
pub mod layout;
pub mod markup;
pub mod page;
